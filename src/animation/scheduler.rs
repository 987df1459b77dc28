use super::{
    blend,
    clock::{self, FrameClock},
    skeleton::{self, Joint},
    AnimatedEntity, PlayState, SkinnedMesh,
};
use crate::{
    anim_error::AnimError,
    config::{AnimationConfig, ClockMode, MissingTransform},
    registry::{Names, Registry, SharedRegistry, Store},
    types::{Entity, Transform},
};
use log::{debug, error, info, trace, warn};

/// What happened during one call to `Scheduler::update`
#[derive(Debug, Default)]
pub struct TickReport {
    /// A rigid animation frame fired this tick
    pub rigid_frame: bool,
    /// A skeletal animation frame fired this tick
    pub skeletal_frame: bool,
    /// Rigid animations that wrote a keyframe
    pub rigid_advanced: usize,
    /// Skeletons stepped forward one keyframe
    pub skeletons_advanced: usize,
    /// Skeletons rewound to their first keyframe
    pub skeletons_restarted: usize,
    /// Recoverable problems, at most one per component per pass
    pub diagnostics: Vec<AnimError>,
}

impl TickReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Some joint matrices may have changed this tick
    #[must_use]
    pub const fn skeleton_changed(&self) -> bool {
        self.skeletons_advanced + self.skeletons_restarted > 0
    }

    /// Diagnostics about one entity
    pub fn diagnostics_for(
        &self,
        entity: Entity,
    ) -> impl Iterator<Item = &AnimError> {
        self.diagnostics
            .iter()
            .filter(move |e| e.entity() == Some(entity))
    }
}

/// Drives all keyframe animation once per engine frame
///
/// Each `update` runs three passes over the registry in order: rigid
/// animations, skeletons, then blend shapes. The passes run to completion on
/// the calling thread and nothing else may touch the registry while they do.
#[derive(Debug, Default)]
pub struct Scheduler {
    config: AnimationConfig,
    clock: FrameClock,
    tick_count: u64,
}

impl Scheduler {
    #[must_use]
    pub fn new(config: AnimationConfig) -> Self {
        Self {
            config,
            clock: FrameClock::default(),
            tick_count: 0,
        }
    }

    /// Puts the clocks back to zero. Calling it on a new scheduler changes
    /// nothing.
    pub fn init(&mut self) {
        self.clock.reset();
        self.tick_count = 0;
        debug!("init clock_mode={:?}", self.config.clock_mode);
    }

    /// Called once everything has been loaded. Only reports what is there.
    pub fn late_init(&self, registry: &Registry) {
        let joints: usize = registry
            .skinned_meshes
            .iter()
            .filter_map(|(_, sm)| sm.root.as_ref())
            .map(Joint::count)
            .sum();
        info!(
            "late_init animations={} skinned_meshes={} joints={} \
             blend_shape_sets={}",
            registry.animations.len(),
            registry.skinned_meshes.len(),
            joints,
            registry.blend_shapes.len()
        );
    }

    #[must_use]
    pub const fn config(&self) -> &AnimationConfig {
        &self.config
    }

    #[must_use]
    pub const fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Number of completed `update` calls since construction or `init`
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Advances the clocks by `elapsed_seconds` and runs the animation
    /// passes
    ///
    /// # Errors
    /// Returns `AnimError::MissingTransform` if an animated entity has no
    /// transform and the configuration says that is fatal. Everything else
    /// goes into the `TickReport`.
    pub fn update(
        &mut self,
        registry: &mut Registry,
        elapsed_seconds: f32,
    ) -> Result<TickReport, AnimError> {
        let usable = elapsed_seconds.is_finite() && elapsed_seconds >= 0.0;
        let elapsed_ms = if usable {
            elapsed_seconds * 1000.0
        } else {
            warn!("ignoring elapsed time of {elapsed_seconds}s");
            0.0
        };
        self.clock.advance(elapsed_ms);

        let Registry {
            names,
            transforms,
            meshes,
            animations,
            skinned_meshes,
            blend_shapes,
            ..
        } = registry;

        let mut report = TickReport::default();
        self.rigid_pass(
            animations,
            transforms,
            names,
            elapsed_ms,
            &mut report,
        )?;
        self.skeletal_pass(skinned_meshes, elapsed_ms, &mut report);
        blend::deform_all(blend_shapes, meshes, names, &mut report.diagnostics);

        self.tick_count += 1;
        trace!(
            "tick={} rigid_frame={} skeletal_frame={} rigid_advanced={} \
             skeletons_advanced={} skeletons_restarted={} diagnostics={}",
            self.tick_count,
            report.rigid_frame,
            report.skeletal_frame,
            report.rigid_advanced,
            report.skeletons_advanced,
            report.skeletons_restarted,
            report.diagnostics.len()
        );
        Ok(report)
    }

    /// Same as `update` but for a registry shared between threads. The lock
    /// is held for the whole tick.
    ///
    /// # Errors
    /// See `update`
    pub fn update_shared(
        &mut self,
        registry: &SharedRegistry,
        elapsed_seconds: f32,
    ) -> Result<TickReport, AnimError> {
        let mut guard = registry.lock();
        self.update(&mut guard, elapsed_seconds)
    }

    /// Decides whether a component's frame fires this tick. `shared_fired`
    /// carries the category flag along the scan in shared mode.
    fn fires(
        mode: ClockMode,
        category_ms: &mut f32,
        shared_fired: &mut bool,
        own_ms: &mut f32,
        frame_ms: f32,
        elapsed_ms: f32,
    ) -> bool {
        match mode {
            ClockMode::Shared => {
                if clock::gate(category_ms, frame_ms) {
                    *shared_fired = true;
                }
                *shared_fired
            }
            ClockMode::PerEntity => {
                *own_ms += elapsed_ms;
                let fired = clock::gate(own_ms, frame_ms);
                if fired && !*shared_fired {
                    *shared_fired = true;
                    *category_ms = 0.0;
                }
                fired
            }
        }
    }

    fn rigid_pass(
        &mut self,
        animations: &mut Store<AnimatedEntity>,
        transforms: &mut Store<Transform>,
        names: &Names,
        elapsed_ms: f32,
        report: &mut TickReport,
    ) -> Result<(), AnimError> {
        let mut shared_fired = false;
        for (entity, anim) in animations.iter_mut() {
            let fires = Self::fires(
                self.config.clock_mode,
                &mut self.clock.rigid_ms,
                &mut shared_fired,
                &mut anim.elapsed_ms,
                anim.frame_ms,
                elapsed_ms,
            );

            let Some(transform) = transforms.get_mut(entity) else {
                let e = AnimError::MissingTransform {
                    entity,
                    name: names.get(entity).to_owned(),
                };
                error!("{e}");
                match self.config.missing_transform {
                    MissingTransform::Skip => {
                        report.diagnostics.push(e);
                        continue;
                    }
                    MissingTransform::Fatal => return Err(e),
                }
            };

            if fires && anim.active && anim.step(transform) {
                report.rigid_advanced += 1;
            }
        }
        report.rigid_frame = shared_fired;
        Ok(())
    }

    fn skeletal_pass(
        &mut self,
        skinned_meshes: &mut Store<SkinnedMesh>,
        elapsed_ms: f32,
        report: &mut TickReport,
    ) {
        let max_depth = self.config.max_joint_depth;
        let mut shared_fired = false;
        for (entity, sm) in skinned_meshes.iter_mut() {
            // No joint chain, nothing to do
            let Some(root) = sm.root.as_mut() else {
                continue;
            };

            let fires = Self::fires(
                self.config.clock_mode,
                &mut self.clock.skeletal_ms,
                &mut shared_fired,
                &mut sm.elapsed_ms,
                sm.frame_ms,
                elapsed_ms,
            );

            let mut complete = true;
            if fires && sm.state == PlayState::Playing {
                complete = skeleton::walk_mut(root, max_depth, Joint::step);
                report.skeletons_advanced += 1;
            }
            // Not gated by the clock
            if sm.state == PlayState::RestartRequested {
                complete = skeleton::walk_mut(root, max_depth, Joint::rewind);
                sm.state = PlayState::Playing;
                report.skeletons_restarted += 1;
                debug!("restarted skeleton on {entity}");
            }

            if !complete {
                let e = AnimError::SkeletonTooDeep { entity, max_depth };
                warn!("{e}");
                report.diagnostics.push(e);
            }
        }
        report.skeletal_frame = shared_fired;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_elapsed_time_is_ignored() {
        let mut registry = Registry::new();
        let mut scheduler = Scheduler::default();
        scheduler.update(&mut registry, -1.0).unwrap();
        scheduler.update(&mut registry, f32::NAN).unwrap();
        assert_eq!(*scheduler.clock(), FrameClock::default());
        assert_eq!(scheduler.tick_count(), 2);
    }

    #[test]
    fn init_resets_clocks() {
        let mut registry = Registry::new();
        let mut scheduler = Scheduler::default();
        scheduler.update(&mut registry, 0.02).unwrap();
        assert!(scheduler.clock().rigid_ms > 0.0);
        scheduler.init();
        assert_eq!(*scheduler.clock(), FrameClock::default());
        assert_eq!(scheduler.tick_count(), 0);
        scheduler.init();
        assert_eq!(*scheduler.clock(), FrameClock::default());
    }

    #[test]
    fn per_entity_mode_resets_category_clock_on_fire() {
        let mut registry = Registry::new();
        let e = registry.spawn("ball").unwrap();
        registry.insert(e, Transform::default());
        registry.insert(
            e,
            AnimatedEntity::new(vec![Transform::default(); 2])
                .with_frame_ms(40.0),
        );
        let mut scheduler = Scheduler::default();
        let report = scheduler.update(&mut registry, 0.03).unwrap();
        assert!(!report.rigid_frame);
        assert!((scheduler.clock().rigid_ms - 30.0).abs() < 0.001);
        let report = scheduler.update(&mut registry, 0.03).unwrap();
        assert!(report.rigid_frame);
        assert!(scheduler.clock().rigid_ms.abs() < 0.001);
        assert!((scheduler.clock().skeletal_ms - 60.0).abs() < 0.001);
    }
}
