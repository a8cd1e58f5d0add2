pub mod payment_worker;
