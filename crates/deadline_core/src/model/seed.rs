//! Built-in example items used when no stored collection is available.

use crate::model::item::{parse_deadline, Item, ItemId, ItemType};

/// Number of items in the seed set.
pub const SEED_ITEM_COUNT: usize = 4;

/// `(id, title, type, deadline, description, completed)` rows.
const SEED_ROWS: [(ItemId, &str, ItemType, &str, &str, bool); SEED_ITEM_COUNT] = [
    (
        1,
        "Tarea de Matemáticas",
        ItemType::Activity,
        "2025-11-20",
        "Resolver ejercicios del capítulo 5",
        false,
    ),
    (
        2,
        "Examen de Historia",
        ItemType::Evaluation,
        "2025-11-22",
        "Examen sobre la Segunda Guerra Mundial",
        false,
    ),
    (
        3,
        "Quiz de Química",
        ItemType::Questionnaire,
        "2025-11-18",
        "Cuestionario sobre enlaces químicos",
        true,
    ),
    (
        4,
        "Debate: Cambio Climático",
        ItemType::Forum,
        "2025-11-25",
        "Participación en foro sobre sostenibilidad",
        false,
    ),
];

/// Returns the fixed seed collection.
pub fn seed_items() -> Vec<Item> {
    SEED_ROWS
        .iter()
        .map(|&(id, title, kind, deadline, description, completed)| Item {
            id,
            title: title.to_string(),
            kind,
            deadline: parse_deadline(deadline).expect("valid seed deadline"),
            description: description.to_string(),
            completed,
        })
        .collect()
}
