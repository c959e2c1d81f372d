use crate::domain::model::TripLedger;
use crate::utils::error::Result;

/// Anything able to produce a validated ledger snapshot.
pub trait TripSource {
    fn load(&self) -> Result<TripLedger>;

    /// Short label used in logs.
    fn describe(&self) -> String;
}

impl<T: TripSource + ?Sized> TripSource for Box<T> {
    fn load(&self) -> Result<TripLedger> {
        (**self).load()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
