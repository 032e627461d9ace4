mod clock;
mod gpu_context;
mod input;
mod input_adapter;

pub use clock::FrameClock;
pub use gpu_context::GpuContext;
pub use input::{Button, InputSnapshot, InputState};
pub use input_adapter::WinitInput;
