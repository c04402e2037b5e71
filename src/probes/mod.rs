/// Certificate status probing channels:
pub mod prober;

/// Time-boxed memoization of probe results:
pub mod cache;
