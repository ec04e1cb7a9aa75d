pub mod creator_writer;
pub mod order_reader;
pub mod payment_writer;
