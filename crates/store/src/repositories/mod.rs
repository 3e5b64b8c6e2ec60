pub mod queue;
pub mod sales;
