/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    /// First extra button (usually "back")
    Extra1,
    /// Second extra button (usually "forward")
    Extra2,
}

impl MouseButton {
    pub(crate) fn from_winit(button: winit::event::MouseButton) -> Option<MouseButton> {
        use winit::event::MouseButton as Wb;
        Some(match button {
            Wb::Left => MouseButton::Left,
            Wb::Right => MouseButton::Right,
            Wb::Middle => MouseButton::Middle,
            Wb::Back => MouseButton::Extra1,
            Wb::Forward => MouseButton::Extra2,
            Wb::Other(_) => return None,
        })
    }
}
