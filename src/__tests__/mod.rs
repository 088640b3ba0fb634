mod commit_test;
mod grammar_test;
mod type_test;
