pub mod ada;
pub mod address;
pub mod aggregation;
pub mod airdrop;
pub mod artifact;
pub mod assembler;
pub mod change;
pub mod codec;
pub mod config;
pub mod error;
pub mod funding;
pub mod ledger;
pub mod metadata;
pub mod outputs;
pub mod reference;
pub mod selection;
pub mod transaction;
pub mod value;
