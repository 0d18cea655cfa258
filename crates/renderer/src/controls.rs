use winit::keyboard::KeyCode;

/// Factor applied to the sweep speed per W/S press.
pub const SPEED_STEP: f64 = 1.3;
const FPS_COARSE_STEP: i32 = 10;
const FPS_FINE_STEP: i32 = 1;

/// Live-tunable loop parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopSettings {
    /// Wait for one vertical blank before swapping.
    pub vsync: bool,
    /// Strip sweep frequency in cycles per second.
    pub speed: f64,
    /// Frame cap; zero or negative disables pacing.
    pub fps_limit: i32,
}

impl LoopSettings {
    pub fn swap_interval(&self) -> u32 {
        u32::from(self.vsync)
    }

    /// Undoes a vsync toggle the driver refused and returns the interval still in effect.
    pub fn revert_vsync(&mut self) -> u32 {
        self.vsync = !self.vsync;
        self.swap_interval()
    }

    /// Applies `action` and reports which setting changed.
    pub fn apply(&mut self, action: KeyAction) -> SettingChange {
        match action {
            KeyAction::Quit => SettingChange::CloseRequested,
            KeyAction::ToggleVsync => {
                self.vsync = !self.vsync;
                SettingChange::SwapInterval(self.swap_interval())
            }
            KeyAction::SpeedUp => {
                self.speed *= SPEED_STEP;
                SettingChange::Speed(self.speed)
            }
            KeyAction::SpeedDown => {
                self.speed /= SPEED_STEP;
                SettingChange::Speed(self.speed)
            }
            KeyAction::AdjustFpsLimit(delta) => {
                self.fps_limit = self.fps_limit.saturating_add(delta);
                SettingChange::FpsLimit(self.fps_limit)
            }
        }
    }
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            vsync: false,
            speed: 0.5,
            fps_limit: 60,
        }
    }
}

/// Keyboard commands understood by the test window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    ToggleVsync,
    SpeedUp,
    SpeedDown,
    AdjustFpsLimit(i32),
}

impl KeyAction {
    /// Binding for a physical key, if any.
    pub fn from_key_code(code: KeyCode) -> Option<Self> {
        let action = match code {
            KeyCode::Escape | KeyCode::KeyQ => KeyAction::Quit,
            KeyCode::KeyV => KeyAction::ToggleVsync,
            KeyCode::KeyW => KeyAction::SpeedUp,
            KeyCode::KeyS => KeyAction::SpeedDown,
            KeyCode::KeyE => KeyAction::AdjustFpsLimit(FPS_COARSE_STEP),
            KeyCode::KeyD => KeyAction::AdjustFpsLimit(-FPS_COARSE_STEP),
            KeyCode::KeyR => KeyAction::AdjustFpsLimit(FPS_FINE_STEP),
            KeyCode::KeyF => KeyAction::AdjustFpsLimit(-FPS_FINE_STEP),
            _ => return None,
        };
        Some(action)
    }
}

/// Outcome of [`LoopSettings::apply`] that the window has to act on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettingChange {
    CloseRequested,
    SwapInterval(u32),
    Speed(f64),
    FpsLimit(i32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bindings_cover_every_documented_key() {
        assert_eq!(KeyAction::from_key_code(KeyCode::Escape), Some(KeyAction::Quit));
        assert_eq!(KeyAction::from_key_code(KeyCode::KeyQ), Some(KeyAction::Quit));
        assert_eq!(KeyAction::from_key_code(KeyCode::KeyV), Some(KeyAction::ToggleVsync));
        assert_eq!(KeyAction::from_key_code(KeyCode::KeyW), Some(KeyAction::SpeedUp));
        assert_eq!(KeyAction::from_key_code(KeyCode::KeyS), Some(KeyAction::SpeedDown));
        assert_eq!(
            KeyAction::from_key_code(KeyCode::KeyE),
            Some(KeyAction::AdjustFpsLimit(10))
        );
        assert_eq!(
            KeyAction::from_key_code(KeyCode::KeyD),
            Some(KeyAction::AdjustFpsLimit(-10))
        );
        assert_eq!(
            KeyAction::from_key_code(KeyCode::KeyR),
            Some(KeyAction::AdjustFpsLimit(1))
        );
        assert_eq!(
            KeyAction::from_key_code(KeyCode::KeyF),
            Some(KeyAction::AdjustFpsLimit(-1))
        );
        assert_eq!(KeyAction::from_key_code(KeyCode::Space), None);
    }

    #[test]
    fn toggling_vsync_twice_restores_swap_interval() {
        let mut settings = LoopSettings::default();
        let original = settings.swap_interval();

        assert_eq!(
            settings.apply(KeyAction::ToggleVsync),
            SettingChange::SwapInterval(1 - original)
        );
        assert_eq!(
            settings.apply(KeyAction::ToggleVsync),
            SettingChange::SwapInterval(original)
        );
        assert_eq!(settings.swap_interval(), original);
    }

    #[test]
    fn speed_steps_are_reversible() {
        let mut settings = LoopSettings::default();
        let original = settings.speed;
        for _ in 0..7 {
            settings.apply(KeyAction::SpeedUp);
        }
        assert!((settings.speed - original * SPEED_STEP.powi(7)).abs() < 1e-9);
        for _ in 0..7 {
            settings.apply(KeyAction::SpeedDown);
        }
        assert!((settings.speed - original).abs() < 1e-9);
    }

    #[test]
    fn fps_limit_is_additive_and_unclamped() {
        let mut settings = LoopSettings {
            fps_limit: 15,
            ..LoopSettings::default()
        };
        settings.apply(KeyAction::AdjustFpsLimit(10));
        settings.apply(KeyAction::AdjustFpsLimit(1));
        assert_eq!(settings.fps_limit, 26);

        for _ in 0..3 {
            settings.apply(KeyAction::AdjustFpsLimit(-10));
        }
        assert_eq!(
            settings.apply(KeyAction::AdjustFpsLimit(-1)),
            SettingChange::FpsLimit(-5)
        );
        assert_eq!(settings.fps_limit, -5);
    }

    #[test]
    fn fps_limit_saturates_at_integer_bounds() {
        let mut settings = LoopSettings {
            fps_limit: i32::MAX,
            ..LoopSettings::default()
        };
        assert_eq!(
            settings.apply(KeyAction::AdjustFpsLimit(1)),
            SettingChange::FpsLimit(i32::MAX)
        );
        assert_eq!(
            settings.apply(KeyAction::AdjustFpsLimit(10)),
            SettingChange::FpsLimit(i32::MAX)
        );

        settings.fps_limit = i32::MIN;
        assert_eq!(
            settings.apply(KeyAction::AdjustFpsLimit(-1)),
            SettingChange::FpsLimit(i32::MIN)
        );
        assert_eq!(
            settings.apply(KeyAction::AdjustFpsLimit(-10)),
            SettingChange::FpsLimit(i32::MIN)
        );
        assert_eq!(
            settings.apply(KeyAction::AdjustFpsLimit(1)),
            SettingChange::FpsLimit(i32::MIN + 1)
        );
    }

    #[test]
    fn refused_vsync_toggle_restores_previous_interval() {
        let mut settings = LoopSettings::default();
        let original = settings.swap_interval();

        settings.apply(KeyAction::ToggleVsync);
        assert_eq!(settings.revert_vsync(), original);
        assert_eq!(settings, LoopSettings::default());
    }

    #[test]
    fn quit_leaves_settings_untouched() {
        let mut settings = LoopSettings::default();
        assert_eq!(settings.apply(KeyAction::Quit), SettingChange::CloseRequested);
        assert_eq!(settings, LoopSettings::default());
    }
}
