//! Schematic net graph
//!
//! A schematic holds the placed net points, the net lines between them and the
//! symbol pins they can attach to. Besides ownership it answers the spatial
//! queries the editor needs ("what is at this position?") and computes net
//! segments (connected groups of net points) with petgraph's union-find.

pub mod cmd;

use petgraph::unionfind::UnionFind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::circuit::Circuit;
use crate::core::{CommandError, EditorOptions, Result};
use crate::geometry::Point;

/// A connection location on the schematic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetPoint {
    pub uuid: Uuid,
    pub position: Point,
    pub net_signal: Uuid,
}

/// End of a net line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Anchor {
    NetPoint(Uuid),
    Pin(Uuid),
}

impl Anchor {
    pub fn net_point(&self) -> Option<Uuid> {
        match self {
            Anchor::NetPoint(uuid) => Some(*uuid),
            Anchor::Pin(_) => None,
        }
    }
}

/// A wire between two anchors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetLine {
    pub uuid: Uuid,
    pub start: Anchor,
    pub end: Anchor,
}

impl NetLine {
    pub fn is_attached_to(&self, anchor: Anchor) -> bool {
        self.start == anchor || self.end == anchor
    }

    /// The anchor at the other end, if `anchor` is one of the ends.
    pub fn other_end(&self, anchor: Anchor) -> Option<Anchor> {
        if self.start == anchor {
            Some(self.end)
        } else if self.end == anchor {
            Some(self.start)
        } else {
            None
        }
    }
}

/// A component pin placed on the schematic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolPin {
    pub uuid: Uuid,
    /// e.g. "U1-3"
    pub name: String,
    pub position: Point,
    pub net_signal: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schematic {
    pub uuid: Uuid,
    pub name: String,
    hit_tolerance: i64,
    max_extent: i64,
    net_points: Vec<NetPoint>,
    net_lines: Vec<NetLine>,
    pins: Vec<SymbolPin>,
}

impl Schematic {
    pub fn new(name: impl Into<String>, options: &EditorOptions) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            hit_tolerance: options.hit_tolerance.max(0),
            max_extent: options.max_extent,
            net_points: Vec::new(),
            net_lines: Vec::new(),
            pins: Vec::new(),
        }
    }

    pub fn net_points(&self) -> &[NetPoint] {
        &self.net_points
    }

    pub fn net_lines(&self) -> &[NetLine] {
        &self.net_lines
    }

    pub fn symbol_pins(&self) -> &[SymbolPin] {
        &self.pins
    }

    pub fn net_point(&self, uuid: Uuid) -> Option<&NetPoint> {
        self.net_points.iter().find(|np| np.uuid == uuid)
    }

    pub fn net_line(&self, uuid: Uuid) -> Option<&NetLine> {
        self.net_lines.iter().find(|nl| nl.uuid == uuid)
    }

    pub fn symbol_pin(&self, uuid: Uuid) -> Option<&SymbolPin> {
        self.pins.iter().find(|p| p.uuid == uuid)
    }

    /// Place a component pin. Pins belong to the component layer, so this is a
    /// direct setup operation rather than a command.
    pub fn add_symbol_pin(
        &mut self,
        name: impl Into<String>,
        position: Point,
        net_signal: Option<Uuid>,
    ) -> Uuid {
        let uuid = Uuid::new_v4();
        self.pins.push(SymbolPin {
            uuid,
            name: name.into(),
            position,
            net_signal,
        });
        uuid
    }

    /// Net points at `pos`, in the order they were added.
    pub fn net_points_at(&self, pos: Point) -> Vec<&NetPoint> {
        self.net_points
            .iter()
            .filter(|np| np.position.is_near(&pos, self.hit_tolerance))
            .collect()
    }

    /// Net lines running through `pos` (ends included), in the order they
    /// were added.
    pub fn net_lines_at(&self, pos: Point) -> Vec<&NetLine> {
        self.net_lines
            .iter()
            .filter(|nl| match (self.anchor_position(nl.start), self.anchor_position(nl.end)) {
                (Some(a), Some(b)) => pos.is_on_segment(&a, &b, self.hit_tolerance),
                _ => false,
            })
            .collect()
    }

    /// Symbol pins at `pos`, in the order they were added.
    pub fn symbol_pins_at(&self, pos: Point) -> Vec<&SymbolPin> {
        self.pins
            .iter()
            .filter(|p| p.position.is_near(&pos, self.hit_tolerance))
            .collect()
    }

    pub fn anchor_position(&self, anchor: Anchor) -> Option<Point> {
        match anchor {
            Anchor::NetPoint(uuid) => self.net_point(uuid).map(|np| np.position),
            Anchor::Pin(uuid) => self.symbol_pin(uuid).map(|p| p.position),
        }
    }

    pub fn is_near(&self, a: Point, b: Point) -> bool {
        a.is_near(&b, self.hit_tolerance)
    }

    /// Net signal at an anchor; `None` for an unconnected pin.
    pub fn anchor_net_signal(&self, anchor: Anchor) -> Option<Uuid> {
        match anchor {
            Anchor::NetPoint(uuid) => self.net_point(uuid).map(|np| np.net_signal),
            Anchor::Pin(uuid) => self.symbol_pin(uuid).and_then(|p| p.net_signal),
        }
    }

    /// Net signals carried by a net line's ends, start first, without
    /// duplicates. A line between two unconnected pins carries none.
    pub fn net_line_net_signals(&self, net_line: &NetLine) -> Vec<Uuid> {
        let mut signals = Vec::new();
        for anchor in [net_line.start, net_line.end] {
            if let Some(signal) = self.anchor_net_signal(anchor) {
                if !signals.contains(&signal) {
                    signals.push(signal);
                }
            }
        }
        signals
    }

    /// Net lines attached to `anchor`.
    pub fn net_lines_of(&self, anchor: Anchor) -> Vec<&NetLine> {
        self.net_lines
            .iter()
            .filter(|nl| nl.is_attached_to(anchor))
            .collect()
    }

    /// Rejects positions a net point cannot be placed at.
    pub fn check_position(&self, pos: Point) -> Result<()> {
        let limit = self.max_extent.max(0).unsigned_abs();
        if pos.x.unsigned_abs() > limit || pos.y.unsigned_abs() > limit {
            return Err(CommandError::InvalidGeometry(format!(
                "position {} is outside of the schematic area (+/- {} nm)",
                pos, self.max_extent
            )));
        }
        Ok(())
    }

    /// Finds dangling references.
    pub fn check_consistency(&self, circuit: &Circuit) -> Result<()> {
        for np in &self.net_points {
            if circuit.net_signal(np.net_signal).is_none() {
                return Err(CommandError::InconsistentModel(format!(
                    "net point {} refers to unknown net signal {}",
                    np.uuid, np.net_signal
                )));
            }
        }
        for pin in &self.pins {
            if let Some(signal) = pin.net_signal {
                if circuit.net_signal(signal).is_none() {
                    return Err(CommandError::InconsistentModel(format!(
                        "pin \"{}\" refers to unknown net signal {}",
                        pin.name, signal
                    )));
                }
            }
        }
        for nl in &self.net_lines {
            for anchor in [nl.start, nl.end] {
                if self.anchor_position(anchor).is_none() {
                    return Err(CommandError::InconsistentModel(format!(
                        "net line {} has a dangling end {:?}",
                        nl.uuid, anchor
                    )));
                }
            }
        }
        Ok(())
    }

    /// Groups of net points connected through net lines.
    ///
    /// Segments are ordered by their first net point; net points inside a
    /// segment keep schematic order.
    pub fn net_segments(&self) -> Vec<Vec<Uuid>> {
        let index: HashMap<Uuid, usize> = self
            .net_points
            .iter()
            .enumerate()
            .map(|(i, np)| (np.uuid, i))
            .collect();
        let mut sets = UnionFind::<usize>::new(self.net_points.len());
        for nl in &self.net_lines {
            let start = nl.start.net_point().and_then(|uuid| index.get(&uuid));
            let end = nl.end.net_point().and_then(|uuid| index.get(&uuid));
            if let (Some(&a), Some(&b)) = (start, end) {
                sets.union(a, b);
            }
        }

        let mut segments: Vec<Vec<Uuid>> = Vec::new();
        let mut segment_of_root: HashMap<usize, usize> = HashMap::new();
        for (i, np) in self.net_points.iter().enumerate() {
            let root = sets.find(i);
            let segment = *segment_of_root.entry(root).or_insert_with(|| {
                segments.push(Vec::new());
                segments.len() - 1
            });
            segments[segment].push(np.uuid);
        }
        segments
    }

    pub(crate) fn insert_net_point(&mut self, index: usize, net_point: NetPoint) -> Result<()> {
        if self.net_point(net_point.uuid).is_some() {
            return Err(CommandError::InconsistentModel(format!(
                "net point {} is already on the schematic",
                net_point.uuid
            )));
        }
        let index = index.min(self.net_points.len());
        self.net_points.insert(index, net_point);
        Ok(())
    }

    /// Remove a net point without net lines. Returns its former index.
    pub(crate) fn remove_net_point(&mut self, uuid: Uuid) -> Result<(usize, NetPoint)> {
        let index = self
            .net_points
            .iter()
            .position(|np| np.uuid == uuid)
            .ok_or_else(|| CommandError::missing(format_args!("net point {}", uuid)))?;
        if !self.net_lines_of(Anchor::NetPoint(uuid)).is_empty() {
            return Err(CommandError::InconsistentModel(format!(
                "net point {} still has net lines",
                uuid
            )));
        }
        Ok((index, self.net_points.remove(index)))
    }

    pub(crate) fn net_point_mut(&mut self, uuid: Uuid) -> Result<&mut NetPoint> {
        self.net_points
            .iter_mut()
            .find(|np| np.uuid == uuid)
            .ok_or_else(|| CommandError::missing(format_args!("net point {}", uuid)))
    }

    pub(crate) fn insert_net_line(&mut self, index: usize, net_line: NetLine) -> Result<()> {
        if self.net_line(net_line.uuid).is_some() {
            return Err(CommandError::InconsistentModel(format!(
                "net line {} is already on the schematic",
                net_line.uuid
            )));
        }
        for anchor in [net_line.start, net_line.end] {
            if self.anchor_position(anchor).is_none() {
                return Err(CommandError::missing(format_args!("net line anchor {:?}", anchor)));
            }
        }
        if net_line.start == net_line.end {
            return Err(CommandError::InvalidGeometry(
                "a net line cannot start and end at the same anchor".to_string(),
            ));
        }
        let index = index.min(self.net_lines.len());
        self.net_lines.insert(index, net_line);
        Ok(())
    }

    pub(crate) fn remove_net_line(&mut self, uuid: Uuid) -> Result<(usize, NetLine)> {
        let index = self
            .net_lines
            .iter()
            .position(|nl| nl.uuid == uuid)
            .ok_or_else(|| CommandError::missing(format_args!("net line {}", uuid)))?;
        Ok((index, self.net_lines.remove(index)))
    }

    pub(crate) fn symbol_pin_mut(&mut self, uuid: Uuid) -> Result<&mut SymbolPin> {
        self.pins
            .iter_mut()
            .find(|p| p.uuid == uuid)
            .ok_or_else(|| CommandError::missing(format_args!("symbol pin {}", uuid)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schematic_with_tolerance(tolerance: i64) -> Schematic {
        let options = EditorOptions {
            hit_tolerance: tolerance,
            ..EditorOptions::default()
        };
        Schematic::new("Main", &options)
    }

    fn net_point(x: i64, y: i64, net_signal: Uuid) -> NetPoint {
        NetPoint {
            uuid: Uuid::new_v4(),
            position: Point::new(x, y),
            net_signal,
        }
    }

    fn line(start: &NetPoint, end: &NetPoint) -> NetLine {
        NetLine {
            uuid: Uuid::new_v4(),
            start: Anchor::NetPoint(start.uuid),
            end: Anchor::NetPoint(end.uuid),
        }
    }

    #[test]
    fn test_net_points_at_keeps_insertion_order() {
        let mut schematic = schematic_with_tolerance(10);
        let signal = Uuid::new_v4();
        let first = net_point(5, 0, signal);
        let second = net_point(0, 0, signal);
        let far = net_point(100, 0, signal);
        for np in [first.clone(), second.clone(), far] {
            schematic.insert_net_point(usize::MAX, np).unwrap();
        }

        let found: Vec<Uuid> = schematic
            .net_points_at(Point::new(0, 0))
            .iter()
            .map(|np| np.uuid)
            .collect();
        assert_eq!(found, vec![first.uuid, second.uuid]);
    }

    #[test]
    fn test_net_lines_at() {
        let mut schematic = schematic_with_tolerance(0);
        let signal = Uuid::new_v4();
        let a = net_point(0, 0, signal);
        let b = net_point(1000, 0, signal);
        schematic.insert_net_point(0, a.clone()).unwrap();
        schematic.insert_net_point(1, b.clone()).unwrap();
        schematic.insert_net_line(0, line(&a, &b)).unwrap();

        assert_eq!(schematic.net_lines_at(Point::new(500, 0)).len(), 1);
        assert_eq!(schematic.net_lines_at(Point::new(0, 0)).len(), 1);
        assert!(schematic.net_lines_at(Point::new(500, 10)).is_empty());
    }

    #[test]
    fn test_position_outside_extent_is_rejected() {
        let options = EditorOptions {
            max_extent: 1000,
            ..EditorOptions::default()
        };
        let schematic = Schematic::new("Main", &options);
        assert!(schematic.check_position(Point::new(1000, -1000)).is_ok());
        assert!(matches!(
            schematic.check_position(Point::new(1001, 0)),
            Err(CommandError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_net_point_with_lines_cannot_be_removed() {
        let mut schematic = schematic_with_tolerance(0);
        let signal = Uuid::new_v4();
        let a = net_point(0, 0, signal);
        let b = net_point(10, 0, signal);
        schematic.insert_net_point(0, a.clone()).unwrap();
        schematic.insert_net_point(1, b.clone()).unwrap();
        schematic.insert_net_line(0, line(&a, &b)).unwrap();

        assert!(schematic.remove_net_point(a.uuid).is_err());
    }

    #[test]
    fn test_net_line_requires_existing_anchors() {
        let mut schematic = schematic_with_tolerance(0);
        let signal = Uuid::new_v4();
        let a = net_point(0, 0, signal);
        let ghost = net_point(10, 0, signal);
        schematic.insert_net_point(0, a.clone()).unwrap();

        assert!(matches!(
            schematic.insert_net_line(0, line(&a, &ghost)),
            Err(CommandError::InconsistentModel(_))
        ));
    }

    #[test]
    fn test_net_segments() {
        let mut schematic = schematic_with_tolerance(0);
        let signal = Uuid::new_v4();
        let a = net_point(0, 0, signal);
        let b = net_point(10, 0, signal);
        let c = net_point(20, 0, signal);
        let d = net_point(30, 0, signal);
        for (i, np) in [&a, &b, &c, &d].into_iter().enumerate() {
            schematic.insert_net_point(i, np.clone()).unwrap();
        }
        schematic.insert_net_line(0, line(&a, &c)).unwrap();
        schematic.insert_net_line(1, line(&d, &b)).unwrap();

        assert_eq!(
            schematic.net_segments(),
            vec![vec![a.uuid, c.uuid], vec![b.uuid, d.uuid]]
        );
    }

    #[test]
    fn test_net_line_signals_come_from_points_and_pins() {
        let mut schematic = schematic_with_tolerance(0);
        let gnd = Uuid::new_v4();
        let vcc = Uuid::new_v4();
        let a = net_point(0, 0, vcc);
        schematic.insert_net_point(0, a.clone()).unwrap();
        let r1 = schematic.add_symbol_pin("R1-1", Point::new(1000, 0), Some(gnd));
        let r2 = schematic.add_symbol_pin("R1-2", Point::new(2000, 0), Some(gnd));
        let open = schematic.add_symbol_pin("R2-1", Point::new(3000, 0), None);

        let pin_to_pin = NetLine {
            uuid: Uuid::new_v4(),
            start: Anchor::Pin(r1),
            end: Anchor::Pin(r2),
        };
        let point_to_pin = NetLine {
            uuid: Uuid::new_v4(),
            start: Anchor::NetPoint(a.uuid),
            end: Anchor::Pin(r1),
        };
        let to_open_pin = NetLine {
            uuid: Uuid::new_v4(),
            start: Anchor::Pin(open),
            end: Anchor::Pin(r2),
        };
        assert_eq!(schematic.net_line_net_signals(&pin_to_pin), vec![gnd]);
        assert_eq!(schematic.net_line_net_signals(&point_to_pin), vec![vcc, gnd]);
        assert_eq!(schematic.net_line_net_signals(&to_open_pin), vec![gnd]);
        assert_eq!(schematic.anchor_net_signal(Anchor::Pin(open)), None);
    }

    #[test]
    fn test_consistency_check_finds_unknown_signal() {
        let mut schematic = schematic_with_tolerance(0);
        schematic
            .insert_net_point(0, net_point(0, 0, Uuid::new_v4()))
            .unwrap();
        assert!(matches!(
            schematic.check_consistency(&Circuit::new()),
            Err(CommandError::InconsistentModel(_))
        ));
    }
}
