//! Nested rebinding over a kanban board.
//!
//! The board lists column ids, each column lists task ids, and every task is
//! its own cell. The resolved board state is a bind over the board whose
//! function builds a sequence of columns, each resolved through a sequence of
//! tasks. Changing any id list re-points the affected part of the graph.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::Serialize;
use serde_json::{json, Value};

use cellbind_core::combinator::{bind, map, sequence};
use cellbind_core::reactive::{Observable, Subscription, Writable};

#[derive(Debug, Clone, Serialize)]
struct Task {
    id: String,
    name: String,
}

#[derive(Debug, Clone, Serialize)]
struct Column {
    id: String,
    tasks: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
struct Board {
    name: String,
    columns: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
struct ColumnState {
    id: String,
    tasks: Vec<Task>,
}

#[derive(Debug, Clone, Serialize)]
struct BoardState {
    name: String,
    columns: Vec<ColumnState>,
}

type Tasks = Rc<HashMap<String, Writable<Task>>>;
type Columns = Rc<HashMap<String, Writable<Column>>>;

struct Fixture {
    tasks: Tasks,
    columns: Columns,
    board: Writable<Board>,
}

impl Fixture {
    fn new() -> Self {
        let tasks = (0..10)
            .map(|n| {
                let id = format!("task-{n}");
                let task = Task {
                    id: id.clone(),
                    name: format!("Task {n}"),
                };
                (id, Writable::new(task))
            })
            .collect();

        let columns = (0..3)
            .map(|n| {
                let id = format!("col-{n}");
                let column = Column {
                    id: id.clone(),
                    tasks: (1..=3).map(|k| format!("task-{}", n * 3 + k)).collect(),
                };
                (id, Writable::new(column))
            })
            .collect();

        let board = Writable::new(Board {
            name: "Kanban Board".to_string(),
            columns: vec!["col-0".into(), "col-1".into(), "col-2".into()],
        });

        Self {
            tasks: Rc::new(tasks),
            columns: Rc::new(columns),
            board,
        }
    }

    fn task(&self, id: &str) -> &Writable<Task> {
        &self.tasks[id]
    }

    fn column(&self, id: &str) -> &Writable<Column> {
        &self.columns[id]
    }

    /// Resolve the board into a cell of its full state.
    fn state(&self) -> impl Observable<Item = BoardState> {
        let columns = Rc::clone(&self.columns);
        let tasks = Rc::clone(&self.tasks);

        bind(self.board.clone(), move |board: &Board| {
            let column_cells: Vec<_> = board.columns.iter().map(|id| columns[id].clone()).collect();
            let board = board.clone();
            let tasks = Rc::clone(&tasks);

            bind(sequence(column_cells), move |columns: &Vec<Column>| {
                let column_states: Vec<_> = columns
                    .iter()
                    .map(|column| {
                        let task_cells: Vec<_> =
                            column.tasks.iter().map(|id| tasks[id].clone()).collect();
                        let id = column.id.clone();
                        map(sequence(task_cells), move |tasks: &Vec<Task>| ColumnState {
                            id: id.clone(),
                            tasks: tasks.clone(),
                        })
                    })
                    .collect();

                let name = board.name.clone();
                map(sequence(column_states), move |columns: &Vec<ColumnState>| BoardState {
                    name: name.clone(),
                    columns: columns.clone(),
                })
            })
        })
    }
}

fn record(cell: &impl Observable<Item = BoardState>) -> (Rc<RefCell<Vec<Value>>>, Subscription) {
    let values = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&values);
    let subscription = cell.subscribe(Rc::new(move |state: &BoardState| {
        sink.borrow_mut()
            .push(serde_json::to_value(state).expect("board state serializes"));
    }));
    (values, subscription)
}

fn expected(name: &str, columns: Vec<(&str, Vec<(&str, &str)>)>) -> Value {
    let columns: Vec<Value> = columns
        .into_iter()
        .map(|(id, tasks)| {
            let tasks: Vec<Value> = tasks
                .into_iter()
                .map(|(id, name)| json!({ "id": id, "name": name }))
                .collect();
            json!({ "id": id, "tasks": tasks })
        })
        .collect();
    json!({ "name": name, "columns": columns })
}

fn drain(values: &Rc<RefCell<Vec<Value>>>) -> Vec<Value> {
    std::mem::take(&mut *values.borrow_mut())
}

#[test]
fn kanban_board_follows_every_level() {
    let fixture = Fixture::new();
    let state = fixture.state();
    let (values, _subscription) = record(&state);

    let col1 = vec![("task-4", "Task 4"), ("task-5", "Task 5"), ("task-6", "Task 6")];
    let col2 = vec![("task-7", "Task 7"), ("task-8", "Task 8"), ("task-9", "Task 9")];

    assert_eq!(
        drain(&values),
        vec![expected(
            "Kanban Board",
            vec![
                ("col-0", vec![("task-1", "Task 1"), ("task-2", "Task 2"), ("task-3", "Task 3")]),
                ("col-1", col1.clone()),
                ("col-2", col2.clone()),
            ],
        )]
    );

    // Rename the board.
    fixture.board.modify(|board| board.name = "Kanban Board Test".into());
    assert_eq!(
        drain(&values),
        vec![expected(
            "Kanban Board Test",
            vec![
                ("col-0", vec![("task-1", "Task 1"), ("task-2", "Task 2"), ("task-3", "Task 3")]),
                ("col-1", col1.clone()),
                ("col-2", col2.clone()),
            ],
        )]
    );

    // Add task-0 to col-0.
    fixture.column("col-0").modify(|column| column.tasks.push("task-0".into()));
    assert_eq!(
        drain(&values),
        vec![expected(
            "Kanban Board Test",
            vec![
                (
                    "col-0",
                    vec![
                        ("task-1", "Task 1"),
                        ("task-2", "Task 2"),
                        ("task-3", "Task 3"),
                        ("task-0", "Task 0"),
                    ],
                ),
                ("col-1", col1.clone()),
                ("col-2", col2.clone()),
            ],
        )]
    );

    // Move task-1 from col-0 to col-1: two updates, two states.
    fixture
        .column("col-0")
        .modify(|column| column.tasks.retain(|id| id != "task-1"));
    fixture.column("col-1").modify(|column| column.tasks.push("task-1".into()));

    let col0_moved = vec![("task-2", "Task 2"), ("task-3", "Task 3"), ("task-0", "Task 0")];
    let mut col1_moved = col1.clone();
    col1_moved.push(("task-1", "Task 1"));
    assert_eq!(
        drain(&values),
        vec![
            expected(
                "Kanban Board Test",
                vec![
                    ("col-0", col0_moved.clone()),
                    ("col-1", col1.clone()),
                    ("col-2", col2.clone()),
                ],
            ),
            expected(
                "Kanban Board Test",
                vec![
                    ("col-0", col0_moved),
                    ("col-1", col1_moved.clone()),
                    ("col-2", col2.clone()),
                ],
            ),
        ]
    );

    // Rename task-2.
    fixture.task("task-2").modify(|task| task.name = "Task two".into());
    assert_eq!(
        drain(&values),
        vec![expected(
            "Kanban Board Test",
            vec![
                ("col-0", vec![("task-2", "Task two"), ("task-3", "Task 3"), ("task-0", "Task 0")]),
                ("col-1", col1_moved.clone()),
                ("col-2", col2.clone()),
            ],
        )]
    );

    // Remove task-3 from col-0.
    fixture
        .column("col-0")
        .modify(|column| column.tasks.retain(|id| id != "task-3"));
    assert_eq!(
        drain(&values),
        vec![expected(
            "Kanban Board Test",
            vec![
                ("col-0", vec![("task-2", "Task two"), ("task-0", "Task 0")]),
                ("col-1", col1_moved.clone()),
                ("col-2", col2.clone()),
            ],
        )]
    );
    assert_eq!(fixture.task("task-3").subscriber_count(), 0);

    // Remove col-1 from the board.
    fixture
        .board
        .modify(|board| board.columns.retain(|id| id != "col-1"));
    assert_eq!(
        drain(&values),
        vec![expected(
            "Kanban Board Test",
            vec![
                ("col-0", vec![("task-2", "Task two"), ("task-0", "Task 0")]),
                ("col-2", col2.clone()),
            ],
        )]
    );

    // Nothing under col-1 is attached any more.
    assert_eq!(fixture.column("col-1").subscriber_count(), 0);
    for id in ["task-4", "task-5", "task-6", "task-1"] {
        assert_eq!(fixture.task(id).subscriber_count(), 0, "{id} still attached");
    }

    // Changes under the removed column are not observed.
    fixture.column("col-1").modify(|column| column.tasks.clear());
    fixture.task("task-5").modify(|task| task.name = "Task five".into());
    assert!(drain(&values).is_empty());
}

#[test]
fn unsubscribing_detaches_the_whole_board() {
    let fixture = Fixture::new();
    let state = fixture.state();
    let (values, subscription) = record(&state);

    assert_eq!(fixture.board.subscriber_count(), 1);
    assert!(fixture.columns.values().all(|column| column.subscriber_count() == 1));
    assert_eq!(fixture.task("task-0").subscriber_count(), 0);
    assert_eq!(fixture.task("task-9").subscriber_count(), 1);

    subscription.unsubscribe();

    assert_eq!(fixture.board.subscriber_count(), 0);
    assert!(fixture.columns.values().all(|column| column.subscriber_count() == 0));
    assert!(fixture.tasks.values().all(|task| task.subscriber_count() == 0));

    fixture.task("task-9").modify(|task| task.name = "Task nine".into());
    fixture.board.modify(|board| board.name = "Renamed".into());
    assert_eq!(values.borrow().len(), 1);
}
