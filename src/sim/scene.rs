//! Scene: body arena plus force-creator registry
//!
//! The scene is the only owner of bodies. Everything else refers to bodies by
//! `BodyHandle`, so sweeping a removed body can never leave a dangling
//! reference behind; lookups of a swept handle simply return `None`.
//!
//! A tick runs in two phases:
//! 1. walk bodies in insertion order, dropping removed ones (and pruning the
//!    registrations that depend on them) and integrating the rest;
//! 2. run every remaining force creator once, in registration order.
//!
//! Forces applied in phase 2 are integrated on the following tick.

use serde::{Deserialize, Serialize};

use super::body::Body;
use crate::error::PhysicsError;

/// Stable identifier of a body within its scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyHandle(u32);

impl BodyHandle {
    #[inline]
    pub fn id(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Slot {
    handle: BodyHandle,
    body: Body,
}

/// Live bodies, kept sorted by handle (which is also insertion order)
#[derive(Debug, Clone, Default)]
pub struct Bodies {
    slots: Vec<Slot>,
}

impl Bodies {
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn index_of(&self, handle: BodyHandle) -> Option<usize> {
        self.slots.binary_search_by_key(&handle, |s| s.handle).ok()
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.index_of(handle).is_some()
    }

    pub fn get(&self, handle: BodyHandle) -> Option<&Body> {
        self.index_of(handle).map(|i| &self.slots[i].body)
    }

    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.index_of(handle).map(|i| &mut self.slots[i].body)
    }

    /// Mutable access to two distinct bodies at once
    pub fn pair_mut(&mut self, a: BodyHandle, b: BodyHandle) -> Option<(&mut Body, &mut Body)> {
        let i = self.index_of(a)?;
        let j = self.index_of(b)?;
        if i == j {
            return None;
        }
        if i < j {
            let (left, right) = self.slots.split_at_mut(j);
            Some((&mut left[i].body, &mut right[0].body))
        } else {
            let (left, right) = self.slots.split_at_mut(i);
            Some((&mut right[0].body, &mut left[j].body))
        }
    }

    /// Body at a position in insertion order
    pub fn try_at(&self, index: usize) -> Result<&Body, PhysicsError> {
        self.slots
            .get(index)
            .map(|s| &s.body)
            .ok_or(PhysicsError::InvalidBodyIndex {
                index,
                count: self.slots.len(),
            })
    }

    /// Body at a position in insertion order.
    ///
    /// Panics if `index` is out of range.
    pub fn at(&self, index: usize) -> &Body {
        match self.try_at(index) {
            Ok(body) => body,
            Err(err) => panic!("{err}"),
        }
    }

    /// Mutable body at a position in insertion order.
    ///
    /// Panics if `index` is out of range.
    pub fn at_mut(&mut self, index: usize) -> &mut Body {
        let count = self.slots.len();
        match self.slots.get_mut(index) {
            Some(slot) => &mut slot.body,
            None => panic!("{}", PhysicsError::InvalidBodyIndex { index, count }),
        }
    }

    /// Handle of the body at a position in insertion order
    pub fn handle_at(&self, index: usize) -> Option<BodyHandle> {
        self.slots.get(index).map(|s| s.handle)
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &Body)> {
        self.slots.iter().map(|s| (s.handle, &s.body))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (BodyHandle, &mut Body)> {
        self.slots.iter_mut().map(|s| (s.handle, &mut s.body))
    }

    pub fn handles(&self) -> impl Iterator<Item = BodyHandle> + '_ {
        self.slots.iter().map(|s| s.handle)
    }
}

/// Per-tick callback. Per-registration data lives in the closure; host-wide
/// state arrives as the context argument.
pub type ForceCreator<C> = Box<dyn FnMut(&mut Bodies, &mut C)>;

/// When a registration is dropped as its dependent bodies leave the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prune {
    /// Drop once every dependent body is gone
    WhenEmpty,
    /// Drop as soon as any dependent body is gone
    WhenAnyRemoved,
}

struct Registration<C> {
    creator: ForceCreator<C>,
    dependents: Vec<BodyHandle>,
    prune: Prune,
}

/// Owns all bodies and force creators of a simulation
pub struct Scene<C = ()> {
    bodies: Bodies,
    registrations: Vec<Registration<C>>,
    next_id: u32,
}

impl<C> Default for Scene<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Scene<C> {
    pub fn new() -> Self {
        Self {
            bodies: Bodies::default(),
            registrations: Vec::new(),
            next_id: 1,
        }
    }

    /// Number of bodies currently owned (removed-but-unswept included)
    #[inline]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn bodies(&self) -> &Bodies {
        &self.bodies
    }

    pub fn bodies_mut(&mut self) -> &mut Bodies {
        &mut self.bodies
    }

    /// Take ownership of a body
    pub fn add_body(&mut self, body: Body) -> BodyHandle {
        let handle = BodyHandle(self.next_id);
        self.next_id += 1;
        self.bodies.slots.push(Slot { handle, body });
        handle
    }

    /// Body at a position in insertion order. Panics if out of range.
    pub fn body(&self, index: usize) -> &Body {
        self.bodies.at(index)
    }

    /// Mutable body at a position in insertion order. Panics if out of range.
    pub fn body_mut(&mut self, index: usize) -> &mut Body {
        self.bodies.at_mut(index)
    }

    pub fn get(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle)
    }

    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(handle)
    }

    /// Mark the body at `index` for removal. Panics if out of range.
    pub fn remove_body(&mut self, index: usize) {
        self.bodies.at_mut(index).remove();
    }

    /// Number of live force-creator registrations
    pub fn registration_count(&self) -> usize {
        self.registrations.len()
    }

    /// Register a creator that is never dropped by body removal
    pub fn add_force_creator<F>(&mut self, creator: F)
    where
        F: FnMut(&mut Bodies, &mut C) + 'static,
    {
        self.register(Box::new(creator), Vec::new(), Prune::WhenEmpty);
    }

    /// Register a creator that stays until all of `dependents` are removed
    pub fn add_bodies_force_creator<F>(&mut self, creator: F, dependents: Vec<BodyHandle>)
    where
        F: FnMut(&mut Bodies, &mut C) + 'static,
    {
        self.register(Box::new(creator), dependents, Prune::WhenEmpty);
    }

    /// Register a creator that is dropped when any of `dependents` is removed
    pub fn add_bound_force_creator<F>(&mut self, creator: F, dependents: Vec<BodyHandle>)
    where
        F: FnMut(&mut Bodies, &mut C) + 'static,
    {
        self.register(Box::new(creator), dependents, Prune::WhenAnyRemoved);
    }

    fn register(&mut self, creator: ForceCreator<C>, dependents: Vec<BodyHandle>, prune: Prune) {
        self.registrations.push(Registration {
            creator,
            dependents,
            prune,
        });
    }

    /// Advance the simulation by `dt` seconds with host context `ctx`
    pub fn tick_with(&mut self, dt: f64, ctx: &mut C) {
        let mut swept = Vec::new();
        self.bodies.slots.retain_mut(|slot| {
            if slot.body.is_removed() {
                swept.push(slot.handle);
                false
            } else {
                slot.body.tick(dt);
                true
            }
        });

        for handle in swept {
            self.prune_dependents(handle);
        }

        for reg in &mut self.registrations {
            (reg.creator)(&mut self.bodies, ctx);
        }
    }

    fn prune_dependents(&mut self, handle: BodyHandle) {
        let before = self.registrations.len();
        self.registrations.retain_mut(|reg| {
            if !reg.dependents.contains(&handle) {
                return true;
            }
            match reg.prune {
                Prune::WhenAnyRemoved => false,
                Prune::WhenEmpty => {
                    reg.dependents.retain(|h| *h != handle);
                    !reg.dependents.is_empty()
                }
            }
        });
        log::debug!(
            "Swept body {}; dropped {} force registrations",
            handle.id(),
            before - self.registrations.len()
        );
    }
}

impl Scene<()> {
    /// Advance the simulation by `dt` seconds
    pub fn tick(&mut self, dt: f64) {
        self.tick_with(dt, &mut ());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::BodyKind;
    use crate::sim::color::Rgb;
    use crate::sim::shapes;
    use crate::sim::vector::{VEC_ZERO, Vector};
    use std::cell::Cell;
    use std::rc::Rc;

    fn square(x: f64) -> Body {
        Body::new(
            shapes::rectangle(Vector::new(x, 0.0), 1.0, 1.0),
            1.0,
            Rgb::WHITE,
            BodyKind::Untagged,
        )
        .unwrap()
    }

    #[test]
    fn test_add_and_lookup() {
        let mut scene: Scene = Scene::new();
        let a = scene.add_body(square(0.0));
        let b = scene.add_body(square(5.0));
        assert_eq!(scene.len(), 2);
        assert_ne!(a, b);
        assert!((scene.get(b).unwrap().centroid().x - 5.0).abs() < 1e-12);
        assert_eq!(scene.bodies().handle_at(0), Some(a));
        assert!((scene.body(1).centroid().x - 5.0).abs() < 1e-12);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_index_out_of_range_panics() {
        let scene: Scene = Scene::new();
        scene.body(0);
    }

    #[test]
    fn test_try_at_reports_count() {
        let mut scene: Scene = Scene::new();
        scene.add_body(square(0.0));
        assert_eq!(
            scene.bodies().try_at(3).unwrap_err(),
            PhysicsError::InvalidBodyIndex { index: 3, count: 1 }
        );
    }

    #[test]
    fn test_pair_mut() {
        let mut scene: Scene = Scene::new();
        let a = scene.add_body(square(0.0));
        let b = scene.add_body(square(5.0));
        {
            let (body_b, body_a) = scene.bodies_mut().pair_mut(b, a).unwrap();
            body_b.set_velocity(Vector::new(1.0, 0.0));
            body_a.set_velocity(Vector::new(-1.0, 0.0));
        }
        assert_eq!(scene.get(a).unwrap().velocity(), Vector::new(-1.0, 0.0));
        assert_eq!(scene.get(b).unwrap().velocity(), Vector::new(1.0, 0.0));
        assert!(scene.bodies_mut().pair_mut(a, a).is_none());
    }

    #[test]
    fn test_sweep_removes_body_and_sole_dependent_registration() {
        let mut scene: Scene = Scene::new();
        let a = scene.add_body(square(0.0));
        let b = scene.add_body(square(5.0));

        scene.add_bodies_force_creator(|_, _| {}, vec![a]);
        scene.add_bodies_force_creator(|_, _| {}, vec![a, b]);
        scene.add_force_creator(|_, _| {});
        assert_eq!(scene.registration_count(), 3);

        scene.get_mut(a).unwrap().remove();
        // Still addressable until the sweep
        assert!(scene.get(a).unwrap().is_removed());
        scene.tick(0.1);

        assert_eq!(scene.len(), 1);
        assert!(scene.get(a).is_none());
        // [a] dropped; [a, b] keeps b; the free creator stays
        assert_eq!(scene.registration_count(), 2);

        scene.get_mut(b).unwrap().remove();
        scene.tick(0.1);
        assert!(scene.is_empty());
        assert_eq!(scene.registration_count(), 1);
    }

    #[test]
    fn test_bound_registration_dropped_on_any_removal() {
        let mut scene: Scene = Scene::new();
        let a = scene.add_body(square(0.0));
        let b = scene.add_body(square(5.0));
        scene.add_bound_force_creator(|_, _| {}, vec![a, b]);

        scene.remove_body(1);
        scene.tick(0.1);
        assert_eq!(scene.registration_count(), 0);
        assert!(scene.get(a).is_some());
    }

    #[test]
    fn test_adjacent_removals_are_all_swept() {
        let mut scene: Scene = Scene::new();
        let handles: Vec<_> = (0..5).map(|i| scene.add_body(square(i as f64 * 3.0))).collect();
        scene.get_mut(handles[1]).unwrap().remove();
        scene.get_mut(handles[2]).unwrap().remove();
        scene.get_mut(handles[4]).unwrap().remove();
        for (_, body) in scene.bodies_mut().iter_mut() {
            body.set_velocity(Vector::new(1.0, 0.0));
        }
        scene.tick(1.0);

        let left: Vec<_> = scene.bodies().handles().collect();
        assert_eq!(left, vec![handles[0], handles[3]]);
        // Survivors integrated exactly once
        assert!((scene.get(handles[0]).unwrap().centroid().x - 1.0).abs() < 1e-12);
        assert!((scene.get(handles[3]).unwrap().centroid().x - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_creators_run_after_integration() {
        let mut scene: Scene = Scene::new();
        let a = scene.add_body(square(0.0));
        scene.add_bodies_force_creator(
            move |bodies, _| {
                if let Some(body) = bodies.get_mut(a) {
                    body.add_impulse(Vector::new(1.0, 0.0));
                }
            },
            vec![a],
        );

        // Impulse from the first tick only shows up on the second
        scene.tick(1.0);
        assert_eq!(scene.get(a).unwrap().velocity(), VEC_ZERO);
        scene.tick(1.0);
        assert_eq!(scene.get(a).unwrap().velocity(), Vector::new(1.0, 0.0));
    }

    #[test]
    fn test_creators_run_once_per_tick_in_order() {
        let mut scene: Scene<Vec<u32>> = Scene::new();
        scene.add_force_creator(|_, log| log.push(1));
        scene.add_force_creator(|_, log| log.push(2));

        let mut log = Vec::new();
        scene.tick_with(0.1, &mut log);
        scene.tick_with(0.1, &mut log);
        assert_eq!(log, vec![1, 2, 1, 2]);
    }

    #[test]
    fn test_dropped_registration_releases_captured_state() {
        let mut scene: Scene = Scene::new();
        let a = scene.add_body(square(0.0));
        let aux = Rc::new(Cell::new(0));
        let captured = Rc::clone(&aux);
        scene.add_bodies_force_creator(move |_, _| captured.set(captured.get() + 1), vec![a]);

        scene.tick(0.1);
        assert_eq!(aux.get(), 1);
        assert_eq!(Rc::strong_count(&aux), 2);

        scene.remove_body(0);
        scene.tick(0.1);
        assert_eq!(aux.get(), 1);
        assert_eq!(Rc::strong_count(&aux), 1);
    }
}
