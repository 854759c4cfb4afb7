use std::fmt::Debug;

pub trait Message: 'static + Debug + Clone + Sized + Send + Sync {}

impl<M> Message for M where M: 'static + Debug + Clone + Sized + Send + Sync {}
