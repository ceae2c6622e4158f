pub mod document_model;
