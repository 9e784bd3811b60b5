mod common;
mod ledger;
