use std::collections::HashMap;

use tracing::{debug, trace};

use crate::error::{AtlasError, Result};
use crate::model::{Location, MAX_SHEET_SIZE, Rect};

/// One texture to place. `id` is the first (or only) id the request occupies;
/// slice requests carry a `cell` size and expand to sequential ids row-major.
#[derive(Debug, Clone, Copy)]
pub struct PackRequest {
    pub id: u32,
    pub width: u32,
    pub height: u32,
    pub cell: Option<(u32, u32)>,
}

/// Final size and placements of one sheet. `width`/`height` come from the
/// incremental bounding-box growth below, not from an exact max-extent scan.
#[derive(Debug, Clone)]
pub struct SheetLayout {
    pub width: u32,
    pub height: u32,
    /// Whole-request rectangles in placement order (slices unexpanded).
    pub placements: Vec<(u32, Rect)>,
}

/// Result of a packing run: sheet layouts plus the per-id location index.
#[derive(Debug, Clone)]
pub struct PackLayout {
    pub sheets: Vec<SheetLayout>,
    pub locations: HashMap<u32, Location>,
}

struct Sheet {
    width: u32,
    height: u32,
    free: Vec<Rect>,
    placements: Vec<(u32, Rect)>,
}

impl Sheet {
    fn new() -> Self {
        Self {
            width: 0,
            height: 0,
            free: vec![Rect::new(0, 0, MAX_SHEET_SIZE, MAX_SHEET_SIZE)],
            placements: Vec::new(),
        }
    }
}

/// Consumes `free[j]` for a `bw`x`bh` placement, pushing the leftover strips.
///
/// The split is fixed (based on rectpack2D): a request matching neither edge
/// takes the free rect's top-left corner and leaves a right strip of the
/// placed height plus a full-width bottom strip. Returns `None` if the
/// request does not fit, leaving `free` untouched.
fn split(free: &mut Vec<Rect>, j: usize, bw: u32, bh: u32) -> Option<Rect> {
    let sp = free[j];
    if bw > sp.w || bh > sp.h {
        return None;
    }
    let found = Rect::new(sp.x, sp.y, bw, bh);
    free.remove(j);
    if bw == sp.w && bh == sp.h {
        // Perfect match, nothing left over.
    } else if bw == sp.w {
        free.push(Rect::new(sp.x, sp.y + bh, sp.w, sp.h - bh));
    } else if bh == sp.h {
        free.push(Rect::new(sp.x + bw, sp.y, sp.w - bw, sp.h));
    } else {
        free.push(Rect::new(sp.x + bw, sp.y, sp.w - bw, bh));
        free.push(Rect::new(sp.x, sp.y + bh, sp.w, sp.h - bh));
    }
    Some(found)
}

/// Packs `requests` into as few sheets as necessary, first-fit over free
/// rectangles kept sorted ascending by area, largest requests first.
pub fn pack(mut requests: Vec<PackRequest>) -> Result<PackLayout> {
    for r in &requests {
        if r.width > MAX_SHEET_SIZE || r.height > MAX_SHEET_SIZE {
            return Err(AtlasError::OversizedEntry {
                width: r.width,
                height: r.height,
            });
        }
    }
    if requests.is_empty() {
        return Ok(PackLayout {
            sheets: Vec::new(),
            locations: HashMap::new(),
        });
    }

    // Largest area first, then widest; the id tie-break keeps results
    // deterministic when recovered entries arrive in map order.
    requests.sort_by(|a, b| {
        let area_a = (a.width as u64) * (a.height as u64);
        let area_b = (b.width as u64) * (b.height as u64);
        area_b
            .cmp(&area_a)
            .then(b.width.cmp(&a.width))
            .then(a.id.cmp(&b.id))
    });

    let mut sheets = vec![Sheet::new()];
    let mut locations: HashMap<u32, Location> = HashMap::new();

    for req in &requests {
        let (bw, bh) = (req.width, req.height);

        let mut found: Option<(usize, Rect)> = None;
        'search: for (i, sheet) in sheets.iter_mut().enumerate() {
            for j in 0..sheet.free.len() {
                if let Some(r) = split(&mut sheet.free, j, bw, bh) {
                    sheet.free.sort_by_key(Rect::area);
                    found = Some((i, r));
                    break 'search;
                }
            }
        }

        let (index, rect) = match found {
            Some(f) => f,
            None => {
                let mut sheet = Sheet::new();
                // A fresh sheet always fits: dimensions were validated above.
                let Some(r) = split(&mut sheet.free, 0, bw, bh) else {
                    return Err(AtlasError::OversizedEntry {
                        width: bw,
                        height: bh,
                    });
                };
                sheet.free.sort_by_key(Rect::area);
                debug!(sheet = sheets.len(), "opened new sheet");
                sheets.push(sheet);
                (sheets.len() - 1, r)
            }
        };

        // Grow the used bounding box so the final buffer covers this
        // placement: a rect on the left edge extends the height, one on the
        // top edge extends the width. Tied to placement order.
        let sheet = &mut sheets[index];
        if rect.x == 0 {
            sheet.height += rect.h;
        }
        if rect.y == 0 {
            sheet.width += rect.w;
        }
        sheet.placements.push((req.id, rect));

        match req.cell {
            Some((cw, ch)) => {
                // One location per grid cell, sequential ids in row-major
                // order, all on the same sheet.
                let mut id = req.id;
                let mut y = 0;
                while y < bh {
                    let mut x = 0;
                    while x < bw {
                        locations.insert(
                            id,
                            Location {
                                sheet: index,
                                rect: Rect::new(rect.x + x, rect.y + y, cw, ch),
                            },
                        );
                        id += 1;
                        x += cw;
                    }
                    y += ch;
                }
            }
            None => {
                locations.insert(req.id, Location { sheet: index, rect });
            }
        }
        trace!(
            id = req.id,
            sheet = index,
            x = rect.x,
            y = rect.y,
            w = rect.w,
            h = rect.h,
            "placed"
        );
    }

    Ok(PackLayout {
        sheets: sheets
            .into_iter()
            .map(|s| SheetLayout {
                width: s.width,
                height: s.height,
                placements: s.placements,
            })
            .collect(),
        locations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(id: u32, w: u32, h: u32) -> PackRequest {
        PackRequest {
            id,
            width: w,
            height: h,
            cell: None,
        }
    }

    #[test]
    fn split_perfect_match_consumes_rect() {
        let mut free = vec![Rect::new(0, 0, 16, 16)];
        let found = split(&mut free, 0, 16, 16).unwrap();
        assert_eq!(found, Rect::new(0, 0, 16, 16));
        assert!(free.is_empty());
    }

    #[test]
    fn split_width_match_leaves_bottom_strip() {
        let mut free = vec![Rect::new(0, 0, 16, 16)];
        let found = split(&mut free, 0, 16, 6).unwrap();
        assert_eq!(found, Rect::new(0, 0, 16, 6));
        assert_eq!(free, vec![Rect::new(0, 6, 16, 10)]);
    }

    #[test]
    fn split_height_match_leaves_right_strip() {
        let mut free = vec![Rect::new(4, 2, 16, 16)];
        let found = split(&mut free, 0, 6, 16).unwrap();
        assert_eq!(found, Rect::new(4, 2, 6, 16));
        assert_eq!(free, vec![Rect::new(10, 2, 10, 16)]);
    }

    #[test]
    fn split_general_case_leaves_right_and_bottom_strips() {
        let mut free = vec![Rect::new(0, 0, 16, 16)];
        let found = split(&mut free, 0, 6, 4).unwrap();
        assert_eq!(found, Rect::new(0, 0, 6, 4));
        assert_eq!(
            free,
            vec![Rect::new(6, 0, 10, 4), Rect::new(0, 4, 16, 12)]
        );
    }

    #[test]
    fn split_rejects_without_modifying() {
        let mut free = vec![Rect::new(0, 0, 8, 8)];
        assert!(split(&mut free, 0, 9, 4).is_none());
        assert_eq!(free, vec![Rect::new(0, 0, 8, 8)]);
    }

    #[test]
    fn oversized_request_is_rejected() {
        let err = pack(vec![req(0, MAX_SHEET_SIZE + 1, 10)]).unwrap_err();
        assert!(matches!(
            err,
            AtlasError::OversizedEntry {
                width,
                height: 10,
            } if width == MAX_SHEET_SIZE + 1
        ));
    }

    #[test]
    fn empty_input_yields_no_sheets() {
        let layout = pack(Vec::new()).unwrap();
        assert!(layout.sheets.is_empty());
        assert!(layout.locations.is_empty());
    }

    #[test]
    fn largest_request_is_placed_first() {
        let layout = pack(vec![req(0, 4, 4), req(1, 32, 32)]).unwrap();
        // The big texture takes the origin, the small one lands beside it.
        assert_eq!(layout.locations[&1].rect, Rect::new(0, 0, 32, 32));
        assert_eq!(layout.locations[&0].rect, Rect::new(32, 0, 4, 4));
    }

    #[test]
    fn bounding_box_tracks_edge_placements() {
        let layout = pack(vec![req(0, 10, 10), req(1, 10, 10)]).unwrap();
        let sheet = &layout.sheets[0];
        // Both land on the top edge; the box covers them side by side.
        assert_eq!((sheet.width, sheet.height), (20, 10));
    }

    #[test]
    fn overflow_opens_second_sheet() {
        let layout = pack(vec![
            req(0, MAX_SHEET_SIZE, MAX_SHEET_SIZE),
            req(1, MAX_SHEET_SIZE, MAX_SHEET_SIZE),
        ])
        .unwrap();
        assert_eq!(layout.sheets.len(), 2);
        assert_eq!(layout.locations[&0].sheet, 0);
        assert_eq!(layout.locations[&1].sheet, 1);
    }

    #[test]
    fn slice_request_expands_row_major_on_one_sheet() {
        let layout = pack(vec![PackRequest {
            id: 7,
            width: 32,
            height: 16,
            cell: Some((16, 16)),
        }])
        .unwrap();
        assert_eq!(layout.locations.len(), 2);
        assert_eq!(layout.locations[&7].rect, Rect::new(0, 0, 16, 16));
        assert_eq!(layout.locations[&8].rect, Rect::new(16, 0, 16, 16));
        assert_eq!(layout.locations[&7].sheet, layout.locations[&8].sheet);
    }

    #[test]
    fn placements_never_overlap() {
        let sizes: Vec<(u32, u32)> = vec![
            (300, 300),
            (300, 300),
            (200, 120),
            (120, 200),
            (64, 64),
            (64, 64),
            (33, 17),
            (17, 33),
            (8, 8),
            (1, 1),
        ];
        let requests: Vec<PackRequest> = sizes
            .iter()
            .enumerate()
            .map(|(i, &(w, h))| req(i as u32, w, h))
            .collect();
        let layout = pack(requests).unwrap();
        let locs: Vec<(u32, Location)> = layout.locations.iter().map(|(k, v)| (*k, *v)).collect();
        for (i, (_, a)) in locs.iter().enumerate() {
            for (_, b) in locs.iter().skip(i + 1) {
                if a.sheet == b.sheet {
                    assert!(!a.rect.intersects(&b.rect), "{a:?} overlaps {b:?}");
                }
            }
        }
        let max = Rect::new(0, 0, MAX_SHEET_SIZE, MAX_SHEET_SIZE);
        for (_, l) in &locs {
            assert!(max.contains(&l.rect));
        }
    }
}
