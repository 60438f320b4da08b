pub mod shift_repo;
