pub mod payment_processor;
pub mod registry;
