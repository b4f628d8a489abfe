pub mod throwable;
