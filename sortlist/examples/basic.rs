// Example: project records, estimate heights and compute a window.
use sortlist::{Align, GroupingMode, HeightCache, ItemId, ListOptions, Projection, WindowCalculator};

fn main() {
    let options = ListOptions::default().with_preview(true);
    let ids: Vec<ItemId> = (0..10_000).map(|i| ItemId::new(format!("rec-{i}"))).collect();

    // Records are grouped by hundreds; preview lists get one label row per group.
    let grouping = GroupingMode::labeled(|_, n: &usize| format!("{}00s", n / 100));
    let projection = Projection::build(
        ids,
        |id| Ok(id.as_str()[4..].parse::<usize>().unwrap_or(0)),
        &grouping,
        options.is_preview,
    );

    let mut heights = HeightCache::new(options.heights, options.is_compact());
    heights.sync(projection.display());
    let window = WindowCalculator::from_sequence(projection.display(), &heights);

    println!("rows={} total_extent={}", projection.len(), window.total_extent());
    println!("window={:?}", window.compute(123_456, 800, options.overscan));

    let off = window.scroll_to_index_offset(5_000, Align::Center, 0, 800);
    println!("scroll_to_index(5000)={off} window={:?}", window.compute(off, 800, 0));
}
