use crate::*;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_u64(&mut self, start: u64, end_exclusive: u64) -> u64 {
        debug_assert!(start < end_exclusive);
        let span = end_exclusive - start;
        start + (self.next_u64() % span)
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        self.gen_range_u64(start as u64, end_exclusive as u64) as usize
    }

    fn gen_range_u32(&mut self, start: u32, end_exclusive: u32) -> u32 {
        self.gen_range_u64(start as u64, end_exclusive as u64) as u32
    }

    fn gen_bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

fn ids(n: usize) -> Vec<ItemId> {
    (0..n).map(|i| ItemId::new(format!("r{i}"))).collect()
}

/// Records carry their group number as detail.
fn by_group() -> GroupingMode<u32> {
    GroupingMode::labeled(|_, group: &u32| format!("g{group}"))
}

fn flat(n: usize) -> DisplaySequence<u32> {
    build_display_sequence(&ids(n), |_| Ok(0), &GroupingMode::Flat, true)
}

fn synced_cache<D>(sequence: &DisplaySequence<D>, is_compact: bool) -> HeightCache {
    let mut cache = HeightCache::new(HeightPolicy::default(), is_compact);
    cache.sync(sequence);
    cache
}

fn expected_window(
    heights: &[u32],
    scroll_offset: u64,
    viewport_height: u32,
    overscan: usize,
) -> Option<(usize, usize, usize, usize)> {
    let n = heights.len();
    if n == 0 {
        return None;
    }
    let total: u64 = heights.iter().map(|&h| h as u64).sum();
    let scroll = scroll_offset.min(total.saturating_sub(viewport_height as u64));

    let mut start = n - 1;
    let mut off = 0u64;
    for (i, &h) in heights.iter().enumerate() {
        off += h as u64;
        if off > scroll {
            start = i;
            break;
        }
    }

    let end = if viewport_height == 0 {
        start
    } else {
        let limit = scroll + viewport_height as u64;
        let mut end = start;
        let mut row_start = 0u64;
        for (i, &h) in heights.iter().enumerate() {
            if row_start < limit && row_start + h as u64 > scroll {
                end = end.max(i);
            }
            row_start += h as u64;
        }
        end
    };

    Some((
        start.saturating_sub(overscan),
        (end + overscan).min(n - 1),
        start,
        end,
    ))
}

#[test]
fn plain_records_use_list_height() {
    let sequence = flat(5);
    let cache = synced_cache(&sequence, false);
    for item in &sequence {
        assert_eq!(cache.get(&item.id), Some(64));
    }
    let window = compute_window(&sequence, &cache, 0, 1000, 0).unwrap();
    assert_eq!(window.total_extent, 320);
}

#[test]
fn compact_records_use_compact_height() {
    let sequence = flat(3);
    let cache = synced_cache(&sequence, true);
    let window = compute_window(&sequence, &cache, 0, 1000, 0).unwrap();
    assert_eq!(window.total_extent, 3 * 28);
}

#[test]
fn first_group_label_has_no_leading_margin() {
    let sequence = DisplaySequence::from_items([
        Item::group_label("label:a", "a"),
        Item::record("r0", 0u32),
        Item::record("r1", 0u32),
        Item::group_label("label:b", "b"),
        Item::record("r2", 1u32),
    ]);
    let cache = synced_cache(&sequence, false);

    assert_eq!(cache.get(&ItemId::from("label:a")), Some(28));
    assert_eq!(cache.get(&ItemId::from("label:b")), Some(40));
    let window = compute_window(&sequence, &cache, 0, 1000, 0).unwrap();
    assert_eq!(window.total_extent, 28 + 64 + 64 + 40 + 64);
}

#[test]
fn estimate_is_pure_in_kind_index_and_mode() {
    let policy = HeightPolicy::default();
    let label: ItemKind<u32> = ItemKind::GroupLabel {
        title: String::from("x"),
    };
    assert_eq!(policy.estimate(&label, 0, false), 28);
    assert_eq!(policy.estimate(&label, 7, true), 40);
    assert_eq!(policy.estimate(&ItemKind::Record(0u32), 0, false), 64);
    assert_eq!(policy.estimate(&ItemKind::Record(0u32), 3, true), 28);
}

#[test]
fn layout_decides_compact_mode() {
    assert!(!ListLayout::List.is_compact());
    assert!(ListLayout::Compact.is_compact());
    assert!(ListLayout::View.is_compact());
    assert!(ListOptions::new().with_layout(ListLayout::View).is_compact());
}

#[test]
fn record_overwrites_estimate_and_is_idempotent() {
    let sequence = flat(2);
    let mut cache = synced_cache(&sequence, false);
    let id = ItemId::from("r1");

    assert!(!cache.is_measured(&id));
    assert_eq!(cache.record(&id, 64), Ok(true)); // same value as the estimate, still recorded
    assert!(cache.is_measured(&id));
    assert_eq!(cache.record(&id, 64), Ok(false));
    assert_eq!(cache.record(&id, 80), Ok(true));
    assert_eq!(cache.get(&id), Some(80));
    assert_eq!(
        cache.entry(&id),
        Some(HeightEntry {
            item_id: id.clone(),
            height: 80,
            is_measured: true,
        })
    );
}

#[test]
fn measurement_for_unknown_id_is_stale() {
    let sequence = flat(2);
    let mut cache = synced_cache(&sequence, false);
    let gone = ItemId::from("r9");
    assert_eq!(
        cache.record(&gone, 10),
        Err(ListError::StaleMeasurement { id: gone.clone() })
    );
    assert_eq!(cache.get(&gone), None);
}

#[test]
fn resync_keeps_measurements_and_drops_departed_ids() {
    let sequence = flat(3);
    let mut cache = synced_cache(&sequence, false);
    cache.record(&ItemId::from("r0"), 100).unwrap();
    cache.record(&ItemId::from("r2"), 90).unwrap();

    // r2 leaves, r0 moves behind a new row.
    let next = DisplaySequence::from_items([
        Item::record("r5", 0u32),
        Item::record("r1", 0u32),
        Item::record("r0", 0u32),
    ]);
    cache.sync(&next);

    assert_eq!(cache.len(), 3);
    assert_eq!(cache.get(&ItemId::from("r0")), Some(100));
    assert!(cache.is_measured(&ItemId::from("r0")));
    assert_eq!(cache.get(&ItemId::from("r5")), Some(64));
    assert_eq!(cache.get(&ItemId::from("r2")), None);
}

#[test]
fn invalidate_reverts_to_estimate() {
    let sequence = DisplaySequence::from_items([
        Item::group_label("label:a", "a"),
        Item::record("r0", 0u32),
        Item::group_label("label:b", "b"),
    ]);
    let mut cache = synced_cache(&sequence, false);
    cache.record(&ItemId::from("label:b"), 55).unwrap();
    cache.record(&ItemId::from("r0"), 70).unwrap();

    assert!(cache.invalidate(&ItemId::from("label:b")));
    assert!(!cache.invalidate(&ItemId::from("label:b")));
    assert_eq!(cache.get(&ItemId::from("label:b")), Some(40));
    assert_eq!(cache.measured_len(), 1);

    cache.invalidate_all();
    assert_eq!(cache.measured_len(), 0);
    assert_eq!(cache.get(&ItemId::from("r0")), Some(64));
}

#[test]
fn compact_toggle_drops_measurements() {
    let sequence = flat(2);
    let mut cache = synced_cache(&sequence, false);
    cache.record(&ItemId::from("r0"), 70).unwrap();

    cache.set_compact(true);
    assert_eq!(cache.measured_len(), 0);
    assert_eq!(cache.get(&ItemId::from("r0")), Some(28));
    assert_eq!(cache.get(&ItemId::from("r1")), Some(28));
}

#[test]
fn measurements_export_and_import_by_id() {
    let sequence = flat(4);
    let mut cache = synced_cache(&sequence, false);
    cache.record(&ItemId::from("r2"), 10).unwrap();
    cache.record(&ItemId::from("r0"), 20).unwrap();

    let snapshot = cache.export_measurements();
    assert_eq!(
        snapshot,
        [(ItemId::from("r0"), 20), (ItemId::from("r2"), 10)]
    );

    let mut other = synced_cache(&flat(2), false);
    assert_eq!(other.import_measurements(snapshot), 1);
    assert_eq!(other.get(&ItemId::from("r0")), Some(20));
    assert_eq!(other.get(&ItemId::from("r1")), Some(64));
}

#[test]
fn window_overscans_and_clamps() {
    let sequence = flat(100);
    let mut cache = synced_cache(&sequence, false);
    for item in &sequence {
        cache.record(&item.id, 10).unwrap();
    }
    let calc = WindowCalculator::from_sequence(&sequence, &cache);
    assert_eq!(calc.total_extent(), 1000);

    let w = calc.compute(50, 30, 2).unwrap();
    assert_eq!((w.visible_start, w.visible_end), (5, 7));
    assert_eq!((w.start_index, w.end_index), (3, 9));
    assert_eq!(w.row_count(), 7);

    let top = calc.compute(0, 30, 30).unwrap();
    assert_eq!((top.start_index, top.end_index), (0, 32));

    // Past the end: clamped to the last full viewport.
    let bottom = calc.compute(5000, 30, 1).unwrap();
    assert_eq!((bottom.visible_start, bottom.visible_end), (97, 99));
    assert_eq!((bottom.start_index, bottom.end_index), (96, 99));
}

#[test]
fn empty_sequence_has_no_window() {
    let sequence = flat(0);
    let cache = synced_cache(&sequence, false);
    assert_eq!(compute_window(&sequence, &cache, 0, 100, 30), None);
    assert_eq!(WindowCalculator::new().full_range(), None);
}

#[test]
fn zero_viewport_realizes_single_row_plus_overscan() {
    let sequence = flat(10);
    let cache = synced_cache(&sequence, false);
    let w = compute_window(&sequence, &cache, 130, 0, 1).unwrap();
    assert_eq!((w.visible_start, w.visible_end), (2, 2));
    assert_eq!((w.start_index, w.end_index), (1, 3));
}

#[test]
fn set_height_matches_full_rebuild() {
    let sequence = flat(50);
    let mut cache = synced_cache(&sequence, false);
    let mut calc = WindowCalculator::from_sequence(&sequence, &cache);

    let mut rng = Lcg::new(7);
    for _ in 0..200 {
        let index = rng.gen_range_usize(0, 50);
        let height = rng.gen_range_u32(0, 200);
        let id = sequence.get(index).unwrap().id.clone();
        let before = calc.item_height(index).unwrap();
        cache.record(&id, height).unwrap();
        let delta = calc.set_height(index, height);
        assert_eq!(delta, height as i64 - before as i64);
    }

    let rebuilt = WindowCalculator::from_sequence(&sequence, &cache);
    assert_eq!(calc.total_extent(), rebuilt.total_extent());
    for i in 0..50 {
        assert_eq!(calc.item_start(i), rebuilt.item_start(i));
    }
}

#[test]
fn scroll_to_index_aligns_row() {
    let sequence = flat(20);
    let cache = synced_cache(&sequence, false);
    let calc = WindowCalculator::from_sequence(&sequence, &cache);

    // Row 10 spans 640..704.
    assert_eq!(calc.scroll_to_index_offset(10, Align::Start, 0, 200), 640);
    assert_eq!(calc.scroll_to_index_offset(10, Align::End, 0, 200), 504);
    assert_eq!(calc.scroll_to_index_offset(10, Align::Center, 0, 200), 572);
    assert_eq!(calc.scroll_to_index_offset(10, Align::Auto, 600, 200), 600);
    assert_eq!(calc.scroll_to_index_offset(10, Align::Auto, 700, 200), 640);
    // Clamped to max scroll (1280 - 200).
    assert_eq!(calc.scroll_to_index_offset(19, Align::Start, 0, 200), 1080);
    assert_eq!(calc.index_at_offset(703), Some(10));
    assert_eq!(calc.item_end(10), Some(704));
}

#[test]
fn window_bounds_and_extent_hold_for_random_sequences() {
    let mut rng = Lcg::new(0x5eed);
    for _ in 0..300 {
        let n = rng.gen_range_usize(1, 120);
        let mut items = Vec::with_capacity(n);
        for i in 0..n {
            if rng.gen_range_u32(0, 5) == 0 {
                items.push(Item::group_label(format!("label:{i}"), "g"));
            } else {
                items.push(Item::record(format!("r{i}"), 0u32));
            }
        }
        let sequence = DisplaySequence::from_items(items);
        let mut cache = synced_cache(&sequence, rng.gen_bool());
        for item in &sequence {
            if rng.gen_bool() {
                let h = rng.gen_range_u32(0, 150);
                cache.record(&item.id, h).unwrap();
            }
        }

        let heights: Vec<u32> = sequence
            .iter()
            .map(|it| cache.get(&it.id).unwrap())
            .collect();
        let total: u64 = heights.iter().map(|&h| h as u64).sum();

        let scroll = rng.gen_range_u64(0, total + 200);
        let viewport = rng.gen_range_u32(0, 400);
        let overscan = rng.gen_range_usize(0, 10);

        let w = compute_window(&sequence, &cache, scroll, viewport, overscan).unwrap();
        assert!(w.start_index <= w.end_index);
        assert!(w.end_index < n);
        assert!(w.start_index <= w.visible_start && w.visible_end <= w.end_index);
        assert_eq!(w.total_extent, total);

        let (start, end, vs, ve) = expected_window(&heights, scroll, viewport, overscan).unwrap();
        assert_eq!(
            (w.start_index, w.end_index, w.visible_start, w.visible_end),
            (start, end, vs, ve),
            "heights={heights:?} scroll={scroll} viewport={viewport} overscan={overscan}"
        );
    }
}

#[test]
fn measurement_overwrite_law_holds_for_random_histories() {
    let sequence = flat(20);
    let mut cache = synced_cache(&sequence, false);
    let mut rng = Lcg::new(42);
    let mut expected: Vec<Option<u32>> = alloc::vec![None; 20];

    for _ in 0..500 {
        let i = rng.gen_range_usize(0, 20);
        let id = ItemId::new(format!("r{i}"));
        match rng.gen_range_u32(0, 4) {
            0 => {
                cache.invalidate(&id);
                expected[i] = None;
            }
            1 => {
                cache.sync(&sequence);
            }
            _ => {
                let h = rng.gen_range_u32(1, 300);
                cache.record(&id, h).unwrap();
                expected[i] = Some(h);
            }
        }
        for (j, want) in expected.iter().enumerate() {
            let got = cache.get(&ItemId::new(format!("r{j}")));
            assert_eq!(got, Some(want.unwrap_or(64)));
        }
    }
}

#[test]
fn flat_projection_keeps_canonical_order() {
    let canonical = ids(4);
    let display = build_display_sequence(&canonical, |_| Ok(1u32), &by_group(), false);
    let got: Vec<&ItemId> = display.iter().map(|it| &it.id).collect();
    assert_eq!(got, canonical.iter().collect::<Vec<_>>());
    assert!(display.iter().all(|it| it.detail() == Some(&1)));
}

#[test]
fn labeled_projection_inserts_label_before_each_group() {
    let canonical = ids(5);
    let groups = [0u32, 0, 1, 1, 0];
    let display = build_display_sequence(
        &canonical,
        |id| {
            let i: usize = id.as_str()[1..].parse().unwrap();
            Ok(groups[i])
        },
        &by_group(),
        true,
    );

    let got: Vec<&str> = display.iter().map(|it| it.id.as_str()).collect();
    assert_eq!(
        got,
        [
            "label:g0", "r0", "r1", "label:g1", "r2", "r3", "label:g0#1", "r4"
        ]
    );
    assert!(display.get(0).unwrap().is_group_label());
    assert_eq!(
        display.get(3).unwrap().kind,
        ItemKind::GroupLabel {
            title: String::from("g1")
        }
    );
}

fn group_ids(sequence: &DisplaySequence<String>) -> Vec<&str> {
    sequence.iter().map(|it| it.id.as_str()).collect()
}

fn assert_unique_ids(sequence: &DisplaySequence<String>) {
    let in_order = group_ids(sequence);
    let mut sorted = in_order.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), in_order.len(), "ids: {in_order:?}");
}

#[test]
fn label_suffix_skips_ids_already_in_use() {
    let canonical = ids(3);
    let groups = ["g", "g#1", "g"];
    let display = build_display_sequence(
        &canonical,
        |id| {
            let i: usize = id.as_str()[1..].parse().unwrap();
            Ok(String::from(groups[i]))
        },
        &GroupingMode::labeled(|_, g: &String| g.clone()),
        true,
    );

    assert_eq!(
        group_ids(&display),
        ["label:g", "r0", "label:g#1", "r1", "label:g#2", "r2"]
    );
    assert_unique_ids(&display);
}

#[test]
fn label_never_takes_a_record_id() {
    let canonical: Vec<ItemId> = ["label:x", "a"].into_iter().map(ItemId::from).collect();
    let display = build_display_sequence(
        &canonical,
        |_| Ok(String::from("x")),
        &GroupingMode::labeled(|_, g: &String| g.clone()),
        true,
    );

    assert_eq!(group_ids(&display), ["label:x#1", "label:x", "a"]);
    assert_unique_ids(&display);

    let projection = Projection::build(
        canonical,
        |_| Ok(String::from("x")),
        &GroupingMode::labeled(|_, g: &String| g.clone()),
        true,
    );
    assert_eq!(projection.display_index_of(&ItemId::new("label:x")), Some(1));
    assert_eq!(projection.display_index_to_canonical(1), Ok(0));
    assert_eq!(
        projection.display_index_to_canonical(0),
        Err(ListError::NotARecord { index: 0 })
    );
}

#[test]
fn rows_without_details_are_omitted() {
    let canonical = ids(3);
    let display = build_display_sequence(
        &canonical,
        |id| {
            if id.as_str() == "r1" {
                Err(ListError::NotFound { id: id.clone() })
            } else {
                Ok(0u32)
            }
        },
        &GroupingMode::Flat,
        true,
    );
    assert_eq!(display.len(), 2);
    assert_eq!(display.position_of(&ItemId::from("r1")), None);
    assert_eq!(display_index_to_canonical(&display, &canonical, 1), Ok(2));
}

#[test]
fn duplicate_canonical_ids_keep_first_occurrence() {
    let canonical = [
        ItemId::from("a"),
        ItemId::from("b"),
        ItemId::from("a"),
    ];
    let display = build_display_sequence(&canonical, |_| Ok(0u32), &GroupingMode::Flat, true);
    assert_eq!(display.len(), 2);
}

#[test]
fn label_rows_do_not_map_to_canonical() {
    let canonical = ids(2);
    let projection = Projection::build(canonical.clone(), |_| Ok(3u32), &by_group(), true);

    assert_eq!(
        projection.display_index_to_canonical(0),
        Err(ListError::NotARecord { index: 0 })
    );
    assert_eq!(
        display_index_to_canonical(projection.display(), &canonical, 0),
        Err(ListError::NotARecord { index: 0 })
    );
    assert_eq!(
        projection.display_index_to_canonical(9),
        Err(ListError::IndexOutOfBounds { index: 9, len: 3 })
    );
    assert_eq!(projection.display_index_to_canonical(2), Ok(1));
    assert_eq!(projection.canonical_to_display(1), Some(2));
}

#[test]
fn projection_round_trips_records() {
    let mut rng = Lcg::new(99);
    for _ in 0..100 {
        let n = rng.gen_range_usize(0, 60);
        let canonical = ids(n);
        let groups: Vec<u32> = (0..n).map(|_| rng.gen_range_u32(0, 4)).collect();
        let missing: Vec<bool> = (0..n).map(|_| rng.gen_range_u32(0, 10) == 0).collect();
        let lookup = |id: &ItemId| {
            let i: usize = id.as_str()[1..].parse().unwrap();
            if missing[i] {
                Err(ListError::NotFound { id: id.clone() })
            } else {
                Ok(groups[i])
            }
        };

        let projection = Projection::build(canonical.clone(), lookup, &by_group(), true);
        let again = build_display_sequence(&canonical, lookup, &by_group(), true);
        assert_eq!(projection.display(), &again);

        for (i, item) in projection.display().iter().enumerate() {
            let mapped = display_index_to_canonical(projection.display(), &canonical, i);
            assert_eq!(mapped, projection.display_index_to_canonical(i));
            match &item.kind {
                ItemKind::Record(_) => {
                    let c = mapped.unwrap();
                    assert_eq!(canonical[c], item.id);
                    assert_eq!(projection.canonical_to_display(c), Some(i));
                }
                ItemKind::GroupLabel { .. } => {
                    assert_eq!(mapped, Err(ListError::NotARecord { index: i }));
                }
            }
        }
    }
}

#[test]
fn projection_from_source_uses_source_order() {
    struct Source;

    impl DataSource for Source {
        type Detail = u32;

        fn record_ids(&self) -> Vec<ItemId> {
            ids(3)
        }

        fn total_count(&self) -> usize {
            10
        }

        fn details(&self, id: &ItemId) -> Result<u32, ListError> {
            Ok(id.as_str().len() as u32)
        }
    }

    let projection = Projection::from_source(&Source, &GroupingMode::Flat, true);
    assert_eq!(projection.canonical(), ids(3).as_slice());
    assert_eq!(projection.display_index_of(&ItemId::from("r2")), Some(2));
    assert_eq!(projection.canonical_index_of(&ItemId::from("r0")), Some(0));
    assert!(Projection::<u32>::empty().is_empty());
}

#[test]
fn errors_render_ids() {
    let err = ListError::NotFound {
        id: ItemId::from("abc"),
    };
    assert_eq!(format!("{err}"), "no entry found for `abc`");
    assert_eq!(
        format!("{}", ListError::NotARecord { index: 3 }),
        "display row 3 is a group label, not a record"
    );
}
