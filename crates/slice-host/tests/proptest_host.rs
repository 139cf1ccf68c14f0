//! Property tests for host-side primitives.
//!
//! These tests use `proptest` to check native block reads, the display
//! bounds test and entity id handling over arbitrary inputs.

use glam::Vec2;
use proptest::prelude::*;
use slice_host::entity::EntityId;
use slice_host::object::{NativeBlock, MODEL_ID_OFFSET, NATIVE_BLOCK_LEN};
use slice_host::projection::within_display_on_either_axis;
use slice_host::HostError;

/// Strategy that generates finite screen coordinates around a 1080p display.
fn screen_coord() -> impl Strategy<Value = f32> {
    (-400_000i32..400_000i32).prop_map(|v| v as f32 * 0.01)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2_000))]

    #[test]
    fn model_id_reads_back(model_id in any::<i32>()) {
        prop_assert_eq!(NativeBlock::with_model_id(model_id).model_id(), Ok(model_id));
    }

    #[test]
    fn model_id_ignores_surrounding_bytes(
        mut bytes in prop::collection::vec(any::<u8>(), NATIVE_BLOCK_LEN),
        model_id in any::<i32>(),
    ) {
        bytes[MODEL_ID_OFFSET..MODEL_ID_OFFSET + 4].copy_from_slice(&model_id.to_le_bytes());
        prop_assert_eq!(NativeBlock::from_bytes(bytes).model_id(), Ok(model_id));
    }

    #[test]
    fn short_blocks_are_rejected(len in 0usize..MODEL_ID_OFFSET + 4) {
        let block = NativeBlock::from_bytes(vec![0xAB; len]);
        prop_assert_eq!(
            block.model_id(),
            Err(HostError::NativeBlockTooShort { len, required: MODEL_ID_OFFSET + 4 })
        );
    }

    #[test]
    fn bounds_test_is_an_or_of_the_axes(x in screen_coord(), y in screen_coord()) {
        let display = Vec2::new(1920.0, 1080.0);
        let inside = within_display_on_either_axis(Vec2::new(x, y), display);
        let x_in = (0.0..1920.0).contains(&x);
        let y_in = (0.0..1080.0).contains(&y);
        prop_assert_eq!(inside, x_in || y_in);
    }

    #[test]
    fn entity_id_raw_value_survives(raw in any::<u32>()) {
        let id = EntityId::from(raw);
        prop_assert_eq!(id.to_raw(), raw);
        prop_assert_eq!(id.is_invalid(), raw == 0xE000_0000);
    }
}
