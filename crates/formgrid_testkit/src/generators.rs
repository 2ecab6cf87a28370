//! Property-based test generators using proptest.

use crate::fixtures::Book;
use formgrid_core::{EntityId, FieldKind, FieldValue};
use proptest::prelude::*;

/// Strategy for generating valid field names.
pub fn field_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,19}").expect("valid regex")
}

/// Strategy for generating a field kind.
pub fn field_kind_strategy() -> impl Strategy<Value = FieldKind> {
    prop_oneof![
        Just(FieldKind::Integer),
        Just(FieldKind::Real),
        Just(FieldKind::Text),
    ]
}

/// Strategy for generating a value of the given kind (or `Absent`).
pub fn field_value_strategy(kind: FieldKind) -> BoxedStrategy<FieldValue> {
    match kind {
        FieldKind::Integer => prop_oneof![
            Just(FieldValue::Absent),
            any::<i64>().prop_map(FieldValue::Integer),
        ]
        .boxed(),
        FieldKind::Real => prop_oneof![
            Just(FieldValue::Absent),
            (proptest::num::f64::NORMAL | proptest::num::f64::ZERO).prop_map(FieldValue::Real),
        ]
        .boxed(),
        FieldKind::Text => prop_oneof![
            Just(FieldValue::Absent),
            "[ -~]{0,30}".prop_map(FieldValue::Text),
        ]
        .boxed(),
    }
}

/// Strategy for generating a book row with a bounded identity.
pub fn book_strategy() -> impl Strategy<Value = Book> {
    (
        1i64..=10_000,
        "[a-zA-Z ]{1,24}",
        "[a-zA-Z]{1,12}",
        proptest::option::of(0.0f64..10_000.0),
    )
        .prop_map(|(id, title, category, price)| Book {
            book_id: Some(EntityId::new(id)),
            title,
            publisher_id: None,
            category,
            price,
        })
}

/// Strategy for generating a list of books with distinct identities.
pub fn book_list_strategy(max_len: usize) -> impl Strategy<Value = Vec<Book>> {
    prop::collection::vec(book_strategy(), 0..=max_len).prop_map(|mut books| {
        // re-key to distinct, ascending identities
        for (index, book) in books.iter_mut().enumerate() {
            book.book_id = Some(EntityId::new(index as i64 + 1));
        }
        books
    })
}

/// Strategy for generating short search queries, including empty ones.
pub fn query_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[ -~]{0,6}").expect("valid regex")
}
