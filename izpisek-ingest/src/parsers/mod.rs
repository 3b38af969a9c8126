pub mod bks_si;
