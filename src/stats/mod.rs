pub mod shrinkage;

pub use shrinkage::{estimate_prior, shrink_means, GroupEstimate, ShrinkagePrior, ShrinkageTable};
