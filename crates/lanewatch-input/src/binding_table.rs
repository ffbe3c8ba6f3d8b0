//! Binding table: hardware code -> lane or control slot.
//!
//! Holds one slot per lane plus the two control slots. Lookups go through a
//! reverse map that is rebuilt on every change, so a rebind is visible to the
//! next `normalize` call and never to one in progress.
use std::collections::HashMap;
use std::fmt;

use lanewatch_config::{Binding, Settings};
use lanewatch_types::{InputCode, LaneEvent, LaneIndex, MIN_LANE_COUNT};
use thiserror::Error;

use crate::device::{NormalizedEvent, RawInputEvent};

/// Non-lane actions a binding can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlAction {
    /// Clear the mistake display.
    Clear,
    /// Show or hide the timing analysis bars.
    ToggleAnalysis,
}

/// Something a code can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Lane(LaneIndex),
    Control(ControlAction),
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Lane(lane) => write!(f, "key {}", lane + 1),
            Slot::Control(ControlAction::Clear) => f.write_str("clear"),
            Slot::Control(ControlAction::ToggleAnalysis) => f.write_str("toggle analysis"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("{code} is already bound to {slot}")]
    AlreadyBound { code: InputCode, slot: Slot },
    #[error("lane {lane} does not exist (lane count is {lane_count})")]
    SlotOutOfRange { lane: LaneIndex, lane_count: usize },
}

#[derive(Debug, Clone)]
pub struct BindingTable {
    lanes: Vec<Option<Binding>>,
    clear: Option<Binding>,
    toggle_analysis: Option<Binding>,
    lookup: HashMap<InputCode, Slot>,
}

impl BindingTable {
    /// Empty table for `lane_count` lanes.
    ///
    /// # Panics
    /// If `lane_count` is below [`MIN_LANE_COUNT`].
    pub fn new(lane_count: usize) -> Self {
        assert!(
            lane_count >= MIN_LANE_COUNT,
            "lane count must be at least {MIN_LANE_COUNT}, got {lane_count}"
        );
        Self {
            lanes: vec![None; lane_count],
            clear: None,
            toggle_analysis: None,
            lookup: HashMap::new(),
        }
    }

    /// Build from validated settings. Conflicting entries are skipped with a warning.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut table = Self::new(settings.lane_count);
        let lanes = settings
            .lane_bindings
            .iter()
            .take(settings.lane_count)
            .enumerate()
            .map(|(lane, b)| (Slot::Lane(lane), b));
        let controls = [
            (Slot::Control(ControlAction::Clear), &settings.clear_binding),
            (
                Slot::Control(ControlAction::ToggleAnalysis),
                &settings.toggle_analysis_binding,
            ),
        ];
        for (slot, binding) in lanes.chain(controls) {
            if let Some(binding) = binding
                && let Err(e) = table.bind(slot, binding.clone())
            {
                log::warn!("skipping binding for {slot}: {e}");
            }
        }
        table
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    pub fn binding(&self, slot: Slot) -> Option<&Binding> {
        match slot {
            Slot::Lane(lane) => self.lanes.get(lane).and_then(Option::as_ref),
            Slot::Control(ControlAction::Clear) => self.clear.as_ref(),
            Slot::Control(ControlAction::ToggleAnalysis) => self.toggle_analysis.as_ref(),
        }
    }

    /// Slot currently bound to `code`, if any.
    pub fn slot_of(&self, code: InputCode) -> Option<Slot> {
        self.lookup.get(&code).copied()
    }

    /// Display names of the lane bindings; unbound lanes get an empty string.
    pub fn lane_names(&self) -> Vec<String> {
        self.lanes
            .iter()
            .map(|b| b.as_ref().map(|b| b.name.clone()).unwrap_or_default())
            .collect()
    }

    /// Bind `binding` to `slot`, replacing whatever the slot held before.
    ///
    /// A code bound to a different slot is rejected and the table is left
    /// unchanged. Binding a slot to the code it already holds is a no-op.
    pub fn bind(&mut self, slot: Slot, binding: Binding) -> Result<(), BindError> {
        if let Slot::Lane(lane) = slot
            && lane >= self.lanes.len()
        {
            return Err(BindError::SlotOutOfRange {
                lane,
                lane_count: self.lanes.len(),
            });
        }
        if let Some(&owner) = self.lookup.get(&binding.code)
            && owner != slot
        {
            log::warn!("{} is already bound to {owner}, keeping old binding", binding.name);
            return Err(BindError::AlreadyBound {
                code: binding.code,
                slot: owner,
            });
        }
        log::info!("binding {} to {slot}", binding.name);
        *self.slot_mut(slot) = Some(binding);
        self.rebuild_lookup();
        Ok(())
    }

    /// Remove the binding of `slot`, returning it.
    pub fn unbind(&mut self, slot: Slot) -> Option<Binding> {
        if let Slot::Lane(lane) = slot
            && lane >= self.lanes.len()
        {
            return None;
        }
        let old = self.slot_mut(slot).take();
        self.rebuild_lookup();
        old
    }

    /// Resolve a raw event. `None` means the code is unbound and the event is dropped.
    pub fn normalize(&self, event: &RawInputEvent) -> Option<NormalizedEvent> {
        let slot = self.slot_of(event.code);
        log::debug!("{} {:?} -> {slot:?}", event.code, event.kind);
        match slot? {
            Slot::Lane(lane) => Some(NormalizedEvent::Lane(LaneEvent {
                lane,
                kind: event.kind,
                time_us: event.time_us,
            })),
            Slot::Control(action) => Some(NormalizedEvent::Control {
                action,
                kind: event.kind,
                time_us: event.time_us,
            }),
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Option<Binding> {
        match slot {
            Slot::Lane(lane) => &mut self.lanes[lane],
            Slot::Control(ControlAction::Clear) => &mut self.clear,
            Slot::Control(ControlAction::ToggleAnalysis) => &mut self.toggle_analysis,
        }
    }

    fn rebuild_lookup(&mut self) {
        let lanes = self
            .lanes
            .iter()
            .enumerate()
            .map(|(lane, b)| (Slot::Lane(lane), b));
        let controls = [
            (Slot::Control(ControlAction::Clear), &self.clear),
            (
                Slot::Control(ControlAction::ToggleAnalysis),
                &self.toggle_analysis,
            ),
        ];
        self.lookup = lanes
            .chain(controls)
            .filter_map(|(slot, b)| b.as_ref().map(|b| (b.code, slot)))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lanewatch_types::{MouseButton, PressKind};

    fn raw(code: InputCode, kind: PressKind) -> RawInputEvent {
        RawInputEvent::new(code, kind, 1_000)
    }

    #[test]
    fn from_default_settings_binds_lanes_and_clear() {
        let table = BindingTable::from_settings(&Settings::default());
        assert_eq!(table.lane_count(), 4);
        assert_eq!(table.slot_of(InputCode::Key(30)), Some(Slot::Lane(0)));
        assert_eq!(table.slot_of(InputCode::Key(57)), Some(Slot::Lane(3)));
        assert_eq!(
            table.slot_of(InputCode::Key(41)),
            Some(Slot::Control(ControlAction::Clear))
        );
        assert_eq!(table.lane_names(), vec!["a", "s", "d", "space"]);
    }

    #[test]
    fn normalize_lane_event() {
        let table = BindingTable::from_settings(&Settings::default());
        let event = table
            .normalize(&raw(InputCode::Key(32), PressKind::Release))
            .unwrap();
        assert_eq!(
            event,
            NormalizedEvent::Lane(LaneEvent {
                lane: 2,
                kind: PressKind::Release,
                time_us: 1_000
            })
        );
    }

    #[test]
    fn normalize_control_event() {
        let table = BindingTable::from_settings(&Settings::default());
        let event = table
            .normalize(&raw(InputCode::Key(41), PressKind::Press))
            .unwrap();
        assert!(matches!(
            event,
            NormalizedEvent::Control {
                action: ControlAction::Clear,
                kind: PressKind::Press,
                ..
            }
        ));
    }

    #[test]
    fn normalize_unbound_is_dropped() {
        let table = BindingTable::from_settings(&Settings::default());
        assert!(table.normalize(&raw(InputCode::Key(99), PressKind::Press)).is_none());
        assert!(
            table
                .normalize(&raw(InputCode::Mouse(MouseButton::Left), PressKind::Press))
                .is_none()
        );
    }

    #[test]
    fn rebind_moves_lane_to_new_code() {
        let mut table = BindingTable::from_settings(&Settings::default());
        table
            .bind(Slot::Lane(0), Binding::mouse(MouseButton::Left))
            .unwrap();
        assert_eq!(table.slot_of(InputCode::Key(30)), None);
        assert_eq!(
            table.slot_of(InputCode::Mouse(MouseButton::Left)),
            Some(Slot::Lane(0))
        );
        assert_eq!(table.lane_names()[0], "Button-1");
    }

    #[test]
    fn rebind_to_code_of_other_slot_is_rejected() {
        let mut table = BindingTable::from_settings(&Settings::default());
        let err = table
            .bind(Slot::Lane(0), Binding::key(31, "s"))
            .unwrap_err();
        assert_eq!(
            err,
            BindError::AlreadyBound {
                code: InputCode::Key(31),
                slot: Slot::Lane(1)
            }
        );
        // prior bindings retained
        assert_eq!(table.slot_of(InputCode::Key(30)), Some(Slot::Lane(0)));
        assert_eq!(table.slot_of(InputCode::Key(31)), Some(Slot::Lane(1)));
    }

    #[test]
    fn rebind_to_own_code_is_noop() {
        let mut table = BindingTable::from_settings(&Settings::default());
        table.bind(Slot::Lane(2), Binding::key(32, "d")).unwrap();
        assert_eq!(table.slot_of(InputCode::Key(32)), Some(Slot::Lane(2)));
    }

    #[test]
    fn bind_out_of_range_lane() {
        let mut table = BindingTable::new(4);
        assert_eq!(
            table.bind(Slot::Lane(4), Binding::key(1, "esc")),
            Err(BindError::SlotOutOfRange {
                lane: 4,
                lane_count: 4
            })
        );
    }

    #[test]
    fn unbind_removes_lookup() {
        let mut table = BindingTable::from_settings(&Settings::default());
        let old = table.unbind(Slot::Control(ControlAction::Clear)).unwrap();
        assert_eq!(old.code, InputCode::Key(41));
        assert!(table.normalize(&raw(InputCode::Key(41), PressKind::Press)).is_none());
        assert!(table.unbind(Slot::Lane(9)).is_none());
    }

    #[test]
    fn toggle_analysis_binding() {
        let mut table = BindingTable::new(4);
        table
            .bind(
                Slot::Control(ControlAction::ToggleAnalysis),
                Binding::key(15, "tab"),
            )
            .unwrap();
        let event = table
            .normalize(&raw(InputCode::Key(15), PressKind::Press))
            .unwrap();
        assert!(matches!(
            event,
            NormalizedEvent::Control {
                action: ControlAction::ToggleAnalysis,
                ..
            }
        ));
    }

    #[test]
    #[should_panic(expected = "lane count must be at least")]
    fn new_rejects_two_lanes() {
        BindingTable::new(2);
    }

    proptest::proptest! {
        #[test]
        fn every_code_maps_to_at_most_one_slot(
            ops in proptest::collection::vec((0usize..6, 0u32..8), 0..40)
        ) {
            let mut table = BindingTable::new(4);
            for (slot_id, code) in ops {
                let slot = match slot_id {
                    4 => Slot::Control(ControlAction::Clear),
                    5 => Slot::Control(ControlAction::ToggleAnalysis),
                    lane => Slot::Lane(lane),
                };
                let _ = table.bind(slot, Binding::key(code, format!("k{code}")));
            }
            let slots = (0..4)
                .map(Slot::Lane)
                .chain([
                    Slot::Control(ControlAction::Clear),
                    Slot::Control(ControlAction::ToggleAnalysis),
                ]);
            let mut seen = std::collections::HashSet::new();
            for slot in slots {
                if let Some(binding) = table.binding(slot) {
                    proptest::prop_assert!(seen.insert(binding.code));
                    proptest::prop_assert_eq!(table.slot_of(binding.code), Some(slot));
                }
            }
        }
    }
}
