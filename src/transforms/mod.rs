pub mod class_candidate;
pub mod convert_to_class;
pub mod method_candidate;
