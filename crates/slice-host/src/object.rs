//! Game object records as the host exposes them each frame.
//!
//! A [`GameObject`] is a value snapshot of one slot in the client's object
//! table. Besides the managed fields (id, kind, pose) it carries a
//! [`NativeBlock`]: a copy of the leading bytes of the client's native object
//! struct. Some data, notably the model id, is only reachable through that
//! block.
//!
//! # Native layout
//!
//! The model id lives at [`MODEL_ID_OFFSET`] as a little-endian `i32`. This
//! offset is a property of the client build, not of this crate. When the
//! client layout changes, [`MODEL_ID_OFFSET`] is the only thing to update.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::entity::EntityId;
use crate::HostError;

/// Byte offset of the model id within the client's native game object.
pub const MODEL_ID_OFFSET: usize = 0x80;

/// Number of native bytes copied by [`NativeBlock::from_raw`].
pub const NATIVE_BLOCK_LEN: usize = 0x90;

// ---------------------------------------------------------------------------
// ObjectKind
// ---------------------------------------------------------------------------

/// Object kind as reported by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ObjectKind {
    None = 0,
    Player = 1,
    BattleNpc = 2,
    EventNpc = 3,
    Treasure = 4,
    Aetheryte = 5,
    GatheringPoint = 6,
    /// Static event prop. Hazard markers are of this kind.
    EventObj = 7,
    MountType = 8,
    Companion = 9,
    Retainer = 10,
    Area = 11,
    Housing = 12,
    Cutscene = 13,
    CardStand = 14,
    Ornament = 15,
}

impl ObjectKind {
    /// Decode the raw kind byte. Unknown values map to [`ObjectKind::None`].
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Self::Player,
            2 => Self::BattleNpc,
            3 => Self::EventNpc,
            4 => Self::Treasure,
            5 => Self::Aetheryte,
            6 => Self::GatheringPoint,
            7 => Self::EventObj,
            8 => Self::MountType,
            9 => Self::Companion,
            10 => Self::Retainer,
            11 => Self::Area,
            12 => Self::Housing,
            13 => Self::Cutscene,
            14 => Self::CardStand,
            15 => Self::Ornament,
            _ => Self::None,
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ---------------------------------------------------------------------------
// NativeBlock
// ---------------------------------------------------------------------------

/// Copy of the leading bytes of a native game object.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct NativeBlock {
    bytes: Box<[u8]>,
}

impl NativeBlock {
    /// Wrap bytes already copied out of the client.
    pub fn from_bytes(bytes: impl Into<Box<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// A zeroed block of [`NATIVE_BLOCK_LEN`] bytes with `model_id` written at
    /// [`MODEL_ID_OFFSET`]. Used by hosts that resolve the model id through
    /// their own API, and by tests.
    pub fn with_model_id(model_id: i32) -> Self {
        let mut bytes = vec![0u8; NATIVE_BLOCK_LEN];
        bytes[MODEL_ID_OFFSET..MODEL_ID_OFFSET + 4].copy_from_slice(&model_id.to_le_bytes());
        Self::from_bytes(bytes)
    }

    /// Copy [`NATIVE_BLOCK_LEN`] bytes starting at `address`.
    ///
    /// # Safety
    ///
    /// `address` must point to a live native game object owned by the client,
    /// readable for at least [`NATIVE_BLOCK_LEN`] bytes for the duration of
    /// the call. The copy is made immediately; the pointer is not retained.
    #[allow(unsafe_code)]
    pub unsafe fn from_raw(address: *const u8) -> Self {
        let mut bytes = vec![0u8; NATIVE_BLOCK_LEN];
        // SAFETY: the caller guarantees `address` is readable for
        // NATIVE_BLOCK_LEN bytes, and `bytes` is a fresh allocation that
        // cannot overlap host memory.
        unsafe {
            std::ptr::copy_nonoverlapping(address, bytes.as_mut_ptr(), NATIVE_BLOCK_LEN);
        }
        Self::from_bytes(bytes)
    }

    /// Number of bytes held.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the block holds no bytes at all.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Read the model id at [`MODEL_ID_OFFSET`].
    ///
    /// # Errors
    ///
    /// [`HostError::NativeBlockTooShort`] if the block ends before the model
    /// id field.
    pub fn model_id(&self) -> Result<i32, HostError> {
        self.read_i32(MODEL_ID_OFFSET)
    }

    fn read_i32(&self, offset: usize) -> Result<i32, HostError> {
        let required = offset + std::mem::size_of::<i32>();
        let field = self
            .bytes
            .get(offset..required)
            .ok_or(HostError::NativeBlockTooShort {
                len: self.bytes.len(),
                required,
            })?;
        Ok(i32::from_le(bytemuck::pod_read_unaligned(field)))
    }
}

impl fmt::Debug for NativeBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeBlock")
            .field("len", &self.bytes.len())
            .field("model_id", &self.model_id().ok())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// GameObject
// ---------------------------------------------------------------------------

/// One visible object, snapshotted for the current frame.
#[derive(Debug, Clone)]
pub struct GameObject {
    /// Slot index in the client's object table.
    pub index: usize,
    /// Host entity handle.
    pub entity_id: EntityId,
    /// Object kind.
    pub kind: ObjectKind,
    /// Display name; may be empty.
    pub name: String,
    /// World position. Y is up.
    pub position: Vec3,
    /// Facing angle in radians around the Y axis.
    pub rotation: f32,
    /// Native address, kept for diagnostics only.
    pub address: u64,
    /// Leading bytes of the native object.
    pub native: NativeBlock,
}

impl GameObject {
    /// Model id read from the native block.
    ///
    /// # Errors
    ///
    /// See [`NativeBlock::model_id`].
    pub fn model_id(&self) -> Result<i32, HostError> {
        self.native.model_id()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
