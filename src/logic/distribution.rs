//! How many humans sit in each race, given the total number of appearances to hand out.

/// Split `total_appearances` into per-race human headcounts.
///
/// 1. Fill races of 4; a remainder of 2 or 3 becomes one extra race.
/// 2. A remainder of 1 turns the last 4 into a 3 and a 2 (never a 1-human race).
/// 3. Trade every (2, 4) pair for (3, 3).
///
/// Fewer than 2 appearances cannot form a race and yield an empty list.
/// The list is sorted before the trades; traded 3s are appended at the end.
pub fn human_distribution(total_appearances: usize) -> Vec<u32> {
    if total_appearances < 2 {
        return Vec::new();
    }
    let fours = total_appearances / 4;
    let rem = total_appearances % 4;

    let mut counts = vec![4u32; fours];
    match rem {
        1 if fours >= 1 => {
            counts.pop();
            counts.extend([3, 2]);
        }
        2 => counts.push(2),
        3 => counts.push(3),
        _ => {}
    }
    counts.sort_unstable();

    while let (Some(two), Some(four)) = (
        counts.iter().position(|&c| c == 2),
        counts.iter().position(|&c| c == 4),
    ) {
        // sorted, so every 2 precedes every 4
        counts.remove(four);
        counts.remove(two);
        counts.extend([3, 3]);
    }
    counts
}
