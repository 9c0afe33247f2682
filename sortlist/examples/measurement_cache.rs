// Example: carry measured row heights over to a new list instance.
use sortlist::{GroupingMode, HeightCache, HeightPolicy, ItemId, Projection, WindowCalculator};

fn main() {
    let ids: Vec<ItemId> = (0..20).map(|i| ItemId::new(format!("r{i}"))).collect();
    let projection = Projection::build(ids, |_| Ok(()), &GroupingMode::Flat, false);

    let mut first = HeightCache::new(HeightPolicy::default(), false);
    first.sync(projection.display());
    first.record(&ItemId::new("r2"), 90).expect("r2 is in the sequence");
    first.record(&ItemId::new("r5"), 120).expect("r5 is in the sequence");

    let snapshot = first.export_measurements();
    println!("exported={snapshot:?}");

    let mut second = HeightCache::new(HeightPolicy::default(), false);
    second.sync(projection.display());
    println!(
        "before import: total_extent={}",
        WindowCalculator::from_sequence(projection.display(), &second).total_extent()
    );

    let applied = second.import_measurements(snapshot);
    println!(
        "after import: applied={applied} total_extent={}",
        WindowCalculator::from_sequence(projection.display(), &second).total_extent()
    );
}
