// Example: drive one list instance and reorder a row into an external structure.
use sortlist::{DataSource, GroupingMode, ItemId, ListError, ListOptions, NodeId, Position, Rect};
use sortlist_adapter::{ListController, SelectionControl, Sibling, SiblingOrder, StructureTarget};

struct Notes(Vec<&'static str>);

impl DataSource for Notes {
    type Detail = ();

    fn record_ids(&self) -> Vec<ItemId> {
        self.0.iter().map(|id| ItemId::new(*id)).collect()
    }

    fn total_count(&self) -> usize {
        self.0.len()
    }

    fn details(&self, id: &ItemId) -> Result<(), ListError> {
        if self.0.contains(&id.as_str()) {
            Ok(())
        } else {
            Err(ListError::NotFound { id: id.clone() })
        }
    }
}

/// Prints the edits instead of applying them to a document tree.
struct Page(SiblingOrder);

impl StructureTarget for Page {
    fn sibling_order(&self) -> SiblingOrder {
        self.0.clone()
    }

    fn update_order(&mut self, container_id: &NodeId, new_child_order: Vec<NodeId>) {
        println!("update_order {container_id}: {new_child_order:?}");
    }

    fn move_near(&mut self, anchor_id: &NodeId, moved_ids: &[NodeId], position: Position) {
        println!("move {moved_ids:?} {position:?} {anchor_id}");
    }
}

struct Console;

impl SelectionControl for Console {
    fn set_suppressed(&self, suppressed: bool) {
        println!("selection suppressed={suppressed}");
    }
}

fn main() {
    let notes = Notes(vec!["inbox", "ideas", "journal", "recipes"]);
    let mut page = Page(SiblingOrder::new(
        "favorites",
        notes
            .0
            .iter()
            .map(|id| Sibling::link(format!("link-{id}"), *id))
            .collect(),
    ));

    let options = ListOptions::default().with_preview(true).with_orderable(true);
    let mut list = ListController::mount(options, GroupingMode::Flat, &Console);
    list.sync_viewport(&Rect { width: 320, height: 200 });
    println!("content={:?}", list.reload(&notes).content);

    list.on_measure(&ItemId::new("ideas"), 96);
    println!("total_extent={}", list.total_extent());

    list.drag_start(ItemId::new("recipes"));
    let outcome = list.drag_end(Some(&ItemId::new("ideas")), &mut page);
    println!("outcome={outcome:?}");
}
