/// CRUD operations tests for the counter entity
pub mod counter_tests;
