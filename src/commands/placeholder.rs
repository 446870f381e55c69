//! Pre-built argument source for non-textual invocations.
//!
//! Front ends that already hold typed values (structured requests, tests,
//! other commands) push them here and hand the cursor to a command, which
//! reads them exactly as if they had been typed. Values must be pulled in
//! push order and with the same type they were pushed as.

use std::collections::VecDeque;

use crate::error::CommandError;

use super::cursor::TokenCursor;
use super::types::{ArgType, ArgValue};

/// Cursor backed by one queue per argument type plus the push order.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderCursor {
    order: VecDeque<ArgType>,
    text: VecDeque<Vec<u8>>,
    i8s: VecDeque<i8>,
    i16s: VecDeque<i16>,
    i32s: VecDeque<i32>,
    i64s: VecDeque<i64>,
    u8s: VecDeque<u8>,
    u16s: VecDeque<u16>,
    u32s: VecDeque<u32>,
    u64s: VecDeque<u64>,
    f32s: VecDeque<f32>,
    f64s: VecDeque<f64>,
    bools: VecDeque<bool>,
    full: VecDeque<Vec<u8>>,
    custom: VecDeque<(String, String)>,
    argument_pos: usize,
    remainder_taken: bool,
}

macro_rules! push_methods {
    ($($name:ident($ty:ty) => $queue:ident, $tag:ident;)*) => {
        $(
            pub fn $name(&mut self, value: $ty) {
                self.order.push_back(ArgType::$tag);
                self.$queue.push_back(value);
            }
        )*
    };
}

impl PlaceholderCursor {
    /// Creates an empty cursor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cursor holding `values` in order.
    pub fn from_values(values: impl IntoIterator<Item = ArgValue>) -> Self {
        let mut cursor = Self::new();
        for value in values {
            cursor.push_value(value);
        }
        cursor
    }

    pub fn push_string(&mut self, value: impl Into<String>) {
        self.push_bytes(value.into().into_bytes());
    }

    /// Pushes a text value that need not be UTF-8.
    pub fn push_bytes(&mut self, value: Vec<u8>) {
        self.order.push_back(ArgType::Text);
        self.text.push_back(value);
    }

    push_methods! {
        push_i8(i8) => i8s, I8;
        push_i16(i16) => i16s, I16;
        push_i32(i32) => i32s, I32;
        push_i64(i64) => i64s, I64;
        push_u8(u8) => u8s, U8;
        push_u16(u16) => u16s, U16;
        push_u32(u32) => u32s, U32;
        push_u64(u64) => u64s, U64;
        push_f32(f32) => f32s, F32;
        push_f64(f64) => f64s, F64;
        push_bool(bool) => bools, Bool;
    }

    /// Pushes the value a `full` argument will receive.
    pub fn push_full(&mut self, value: impl Into<String>) {
        self.order.push_back(ArgType::Full);
        self.full.push_back(value.into().into_bytes());
    }

    /// Pushes an already normalized value of a custom type.
    pub fn push_custom(&mut self, type_name: impl Into<String>, value: impl Into<String>) {
        self.order.push_back(ArgType::Custom);
        self.custom.push_back((type_name.into(), value.into()));
    }

    /// Pushes any typed value into its matching queue.
    pub fn push_value(&mut self, value: ArgValue) {
        match value {
            ArgValue::Text(v) => self.push_bytes(v),
            ArgValue::I8(v) => self.push_i8(v),
            ArgValue::I16(v) => self.push_i16(v),
            ArgValue::I32(v) => self.push_i32(v),
            ArgValue::I64(v) => self.push_i64(v),
            ArgValue::U8(v) => self.push_u8(v),
            ArgValue::U16(v) => self.push_u16(v),
            ArgValue::U32(v) => self.push_u32(v),
            ArgValue::U64(v) => self.push_u64(v),
            ArgValue::F32(v) => self.push_f32(v),
            ArgValue::F64(v) => self.push_f64(v),
            ArgValue::Bool(v) => self.push_bool(v),
            ArgValue::Full(v) => {
                self.order.push_back(ArgType::Full);
                self.full.push_back(v);
            }
            ArgValue::Custom { type_name, value } => self.push_custom(type_name, value),
        }
    }

    /// Number of values still queued.
    pub fn remaining(&self) -> usize {
        self.order.len()
    }

    /// Type of the next queued value.
    pub fn peek_type(&self) -> Option<ArgType> {
        self.order.front().copied()
    }

    fn pop(&mut self, kind: ArgType) -> Option<ArgValue> {
        let value = match kind {
            ArgType::Text => ArgValue::Text(self.text.pop_front()?),
            ArgType::I8 => ArgValue::I8(self.i8s.pop_front()?),
            ArgType::I16 => ArgValue::I16(self.i16s.pop_front()?),
            ArgType::I32 => ArgValue::I32(self.i32s.pop_front()?),
            ArgType::I64 => ArgValue::I64(self.i64s.pop_front()?),
            ArgType::U8 => ArgValue::U8(self.u8s.pop_front()?),
            ArgType::U16 => ArgValue::U16(self.u16s.pop_front()?),
            ArgType::U32 => ArgValue::U32(self.u32s.pop_front()?),
            ArgType::U64 => ArgValue::U64(self.u64s.pop_front()?),
            ArgType::F32 => ArgValue::F32(self.f32s.pop_front()?),
            ArgType::F64 => ArgValue::F64(self.f64s.pop_front()?),
            ArgType::Bool => ArgValue::Bool(self.bools.pop_front()?),
            ArgType::Full => ArgValue::Full(self.full.pop_front()?),
            ArgType::Custom => {
                let (type_name, value) = self.custom.pop_front()?;
                ArgValue::Custom { type_name, value }
            }
        };
        self.order.pop_front();
        Some(value)
    }

    fn missing<T>(required: bool) -> Result<Option<T>, CommandError> {
        if required {
            Err(CommandError::NotEnoughArguments)
        } else {
            Ok(None)
        }
    }
}

impl TokenCursor for PlaceholderCursor {
    fn exhausted(&self) -> bool {
        self.remainder_taken || self.order.is_empty()
    }

    fn raw_position(&self) -> usize {
        self.argument_pos
    }

    fn argument_position(&self) -> usize {
        self.argument_pos
    }

    fn next_value(
        &mut self,
        kind: ArgType,
        required: bool,
    ) -> Result<Option<ArgValue>, CommandError> {
        if self.remainder_taken {
            return Err(CommandError::ArgumentsAfterRemainder);
        }
        if kind == ArgType::Custom {
            return Err(CommandError::UnknownCustomType(String::new()));
        }
        if self.peek_type() != Some(kind) {
            return Self::missing(required);
        }
        let Some(value) = self.pop(kind) else {
            return Self::missing(required);
        };

        self.argument_pos += 1;
        if kind == ArgType::Full {
            self.remainder_taken = true;
        }
        Ok(Some(value))
    }

    fn next_custom(
        &mut self,
        type_name: &str,
        required: bool,
    ) -> Result<Option<String>, CommandError> {
        if self.remainder_taken {
            return Err(CommandError::ArgumentsAfterRemainder);
        }
        let matches = self.peek_type() == Some(ArgType::Custom)
            && self.custom.front().is_some_and(|(name, _)| name == type_name);
        if !matches {
            return Self::missing(required);
        }
        match self.pop(ArgType::Custom) {
            Some(ArgValue::Custom { value, .. }) => {
                self.argument_pos += 1;
                Ok(Some(value))
            }
            _ => Self::missing(required),
        }
    }
}
