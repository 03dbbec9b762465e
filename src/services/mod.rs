pub mod budget;
pub mod enrichment;
pub mod materializer;
pub mod openai_client;
pub mod planning;
pub mod response_parser;
pub mod schedule;
