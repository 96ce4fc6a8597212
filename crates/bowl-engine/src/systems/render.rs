use crate::components::entity::Entity;
use crate::renderer::instance::{BallInstance, InstanceBuffer};

/// Rebuild the instance buffer from a set of entities.
/// Only entities carrying a hue are published; hidden ones are kept with
/// `visible = 0` so host-side indices stay stable within a round.
pub fn build_instance_buffer<'a>(
    entities: impl Iterator<Item = &'a Entity>,
    buffer: &mut InstanceBuffer,
) {
    buffer.clear();

    for entity in entities {
        let hue = match entity.hue {
            Some(h) => h,
            None => continue,
        };

        buffer.push(BallInstance {
            x: entity.pos.x,
            y: entity.pos.y,
            rotation: entity.rotation,
            scale: entity.scale,
            hue,
            visible: if entity.visible { 1.0 } else { 0.0 },
            id: entity.id.0 as f32,
            _pad: 0.0,
        });
    }
}
