//! `prost` integration: generated message types plug in without glue code.

use std::any::Any;
use std::marker::PhantomData;

use crate::error::{MessageDecodeError, Result};
use crate::message::{Message, MessageType, MessageValue, Namespace};

impl<T> Message for T
where
    T: prost::Message + prost::Name + 'static,
{
    fn full_name(&self) -> String {
        <T as prost::Name>::full_name()
    }

    fn encode_binary(&self) -> Vec<u8> {
        prost::Message::encode_to_vec(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// [`MessageType`] decoding `T` with `prost`.
pub struct ProstType<T>(PhantomData<fn() -> T>);

impl<T> ProstType<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for ProstType<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MessageType for ProstType<T>
where
    T: prost::Message + prost::Name + Default + 'static,
{
    fn full_name(&self) -> String {
        <T as prost::Name>::full_name()
    }

    fn decode_binary(&self, bytes: &[u8]) -> std::result::Result<MessageValue, MessageDecodeError> {
        Ok(MessageValue::new(<T as prost::Message>::decode(bytes)?))
    }
}

impl Namespace {
    /// Registers the `prost` message `T`.
    pub fn register_prost<T>(&mut self) -> Result<&mut Self>
    where
        T: prost::Message + prost::Name + Default + 'static,
    {
        self.register(ProstType::<T>::new())
    }
}
