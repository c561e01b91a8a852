use types::{FacultyAvailability, HourRange};

/// Sorts each faculty's intervals and coalesces overlapping or touching ones,
/// so a sub-slot straddling two adjacent blocks is still covered.
pub fn normalize(table: &FacultyAvailability) -> FacultyAvailability {
    table
        .iter()
        .map(|(faculty, ranges)| (faculty.clone(), merge(ranges)))
        .collect()
}

fn merge(ranges: &[HourRange]) -> Vec<HourRange> {
    let mut sorted: Vec<HourRange> = ranges.iter().copied().filter(|r| !r.is_empty()).collect();
    sorted.sort();
    let mut out: Vec<HourRange> = Vec::with_capacity(sorted.len());
    for r in sorted {
        match out.last_mut() {
            Some(last) if r.start() <= last.end() => {
                last.1 = last.end().max(r.end());
            }
            _ => out.push(r),
        }
    }
    out
}

pub fn covers(ranges: &[HourRange], sub: &HourRange) -> bool {
    ranges.iter().any(|r| r.covers(sub))
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::FacultyId;

    #[test]
    fn adjacent_blocks_merge() {
        let mut t = FacultyAvailability::new();
        t.insert(
            FacultyId::from("F1"),
            vec![
                HourRange::whole(13, 14),
                HourRange::whole(9, 10),
                HourRange::whole(10, 11),
                HourRange::whole(14, 16),
                HourRange::whole(15, 17),
            ],
        );
        let n = normalize(&t);
        assert_eq!(
            n[&FacultyId::from("F1")],
            vec![HourRange::whole(9, 11), HourRange::whole(13, 17)]
        );
    }

    #[test]
    fn covers_needs_one_block_spanning_the_whole_hour() {
        let blocks = vec![HourRange::whole(9, 11), HourRange::whole(13, 17)];
        assert!(covers(&blocks, &HourRange::whole(10, 11)));
        assert!(!covers(&blocks, &HourRange::whole(11, 12)));
        assert!(!covers(&[], &HourRange::whole(9, 10)));
    }
}
