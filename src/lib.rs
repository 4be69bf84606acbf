#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use rp_copy as copy;
pub use rp_reflect as reflect;
pub use rp_utils as utils;
