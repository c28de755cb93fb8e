pub mod arithmetic;
pub mod fetch;
pub mod gemini;
pub mod story;
