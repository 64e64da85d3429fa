use super::{required, vec3, Builder};
use crate::error::SceneError;
use crate::scene::descriptor::Label;
use crate::scene::object::{LabelContent, Object3D, Transform};

impl Builder<'_> {
    /// Overlay text anchored at `position` (the parent origin when absent),
    /// with optional hover text.
    pub(super) fn make_label(
        &self,
        d: &Label,
        mut parent: Object3D,
    ) -> Result<Object3D, SceneError> {
        let text = required(d.label.as_deref(), "labels", "label")?;
        let anchor = d.position.map_or(Transform::IDENTITY, |p| {
            Transform::from_translation(vec3(p))
        });
        parent.add(
            Object3D::label(LabelContent {
                text: text.to_owned(),
                hover_text: d.hover_label.clone(),
            })
            .at(anchor),
        );
        Ok(parent)
    }
}
