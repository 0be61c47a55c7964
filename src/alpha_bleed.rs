//! Fills fully transparent pixels with the average colour of their opaque
//! neighbours, spreading outwards one ring at a time. Alpha is left at zero,
//! so the icon looks the same, but Lanczos resampling no longer pulls dark
//! fringes in from transparent black.

use bit_vec::BitVec;
use image::{Rgba, RgbaImage};

const NEIGHBOURS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

pub fn bleed_transparent_edges(img: &mut RgbaImage) {
    let (w, h) = img.dimensions();
    let len = (w as usize) * (h as usize);
    let index = |x: u32, y: u32| (y as usize) * (w as usize) + x as usize;

    let neighbours = move |x: u32, y: u32| {
        NEIGHBOURS.iter().filter_map(move |&(dx, dy)| {
            let nx = i64::from(x) + dx;
            let ny = i64::from(y) + dy;
            (nx >= 0 && ny >= 0 && nx < i64::from(w) && ny < i64::from(h))
                .then(|| (nx as u32, ny as u32))
        })
    };

    // Pixels whose colour may be read; grows as each ring is filled.
    let mut coloured = BitVec::from_elem(len, false);
    // Pixels already coloured or waiting in a ring.
    let mut seen = BitVec::from_elem(len, false);
    let mut ring = Vec::new();

    for (x, y, pixel) in img.enumerate_pixels() {
        if pixel[3] != 0 {
            coloured.set(index(x, y), true);
            seen.set(index(x, y), true);
        }
    }
    for y in 0..h {
        for x in 0..w {
            if seen[index(x, y)] {
                continue;
            }
            if neighbours(x, y).any(|(nx, ny)| coloured[index(nx, ny)]) {
                seen.set(index(x, y), true);
                ring.push((x, y));
            }
        }
    }

    while !ring.is_empty() {
        let mut next = Vec::new();
        let mut filled = Vec::with_capacity(ring.len());

        for &(x, y) in &ring {
            let mut sum = [0u32; 3];
            let mut count = 0u32;
            for (nx, ny) in neighbours(x, y) {
                let i = index(nx, ny);
                if coloured[i] {
                    let source = img.get_pixel(nx, ny);
                    for (acc, channel) in sum.iter_mut().zip(source.0) {
                        *acc += u32::from(channel);
                    }
                    count += 1;
                } else if !seen[i] {
                    seen.set(i, true);
                    next.push((nx, ny));
                }
            }
            let count = count.max(1);
            filled.push((x, y, sum.map(|c| (c / count) as u8)));
        }

        // Colours are committed after the whole ring is averaged so that a
        // ring never samples itself.
        for (x, y, [r, g, b]) in filled {
            img.put_pixel(x, y, Rgba([r, g, b, 0]));
            coloured.set(index(x, y), true);
        }
        ring = next;
    }
}
