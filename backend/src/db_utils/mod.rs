pub mod decompose_spans;
pub mod es_utils;
pub mod kb_utils;
