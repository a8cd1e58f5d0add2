pub mod purchase_statuses;
