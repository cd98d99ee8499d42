//! Binding between an overlay and its host node tree

mod binding;
mod slot;

pub use binding::{
    OverlayView, Slot, CLASS_DRAGGABLE, CLASS_DRAGGING, CLASS_LOADING, CLASS_OPEN, CLASS_RESIZING,
    CLASS_ROOT, CLASS_SHAKE,
};
pub use slot::SlotContent;
