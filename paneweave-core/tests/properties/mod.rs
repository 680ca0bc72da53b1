mod persistence_tests;
mod workspace_tests;
