//! Deferred battle tasks
//!
//! Delayed effects (intro end, next question, attack animation reset,
//! staggered boss projectiles) are queued here with a due tick instead of
//! being fired from timers. Each task remembers the session epoch and the
//! battle state it expects, so the session can drop stale tasks after a
//! reset or once the battle has ended.

use smallvec::SmallVec;

/// Battle state a deferred task expects to find when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskGuard {
    Intro,
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    /// Intro cutscene is over, start asking questions
    BeginCombat,
    /// Ask the next question after the post-answer delay
    NextQuestion,
    ClearPlayerAttack,
    ClearBossAttack,
    /// Fire one of the later projectiles of a boss volley, with the damage
    /// fixed when the volley was launched
    SpawnBossProjectile { damage: i32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeferredTask {
    pub due_tick: u64,
    pub epoch: u64,
    pub guard: TaskGuard,
    pub action: DeferredAction,
    sequence: u64,
}

impl DeferredTask {
    /// Whether the task still belongs to the given session epoch and state
    pub fn is_live(&self, epoch: u64, guard: Option<TaskGuard>) -> bool {
        self.epoch == epoch && guard == Some(self.guard)
    }
}

/// Tasks due in a single tick; rarely more than a handful
pub type DueTasks = SmallVec<[DeferredTask; 4]>;

#[derive(Debug, Default)]
pub struct Scheduler {
    tasks: Vec<DeferredTask>,
    next_sequence: u64,
}

impl Scheduler {
    pub fn schedule(
        &mut self,
        now: u64,
        delay: u32,
        epoch: u64,
        guard: TaskGuard,
        action: DeferredAction,
    ) {
        self.tasks.push(DeferredTask {
            due_tick: now + delay as u64,
            epoch,
            guard,
            action,
            sequence: self.next_sequence,
        });
        self.next_sequence += 1;
    }

    /// Remove and return every task due at or before `now`, ordered by due
    /// tick and then by scheduling order.
    pub fn take_due(&mut self, now: u64) -> DueTasks {
        let mut due: DueTasks = SmallVec::new();
        let mut index = 0;
        while index < self.tasks.len() {
            if self.tasks[index].due_tick <= now {
                due.push(self.tasks.swap_remove(index));
            } else {
                index += 1;
            }
        }
        due.sort_by_key(|task| (task.due_tick, task.sequence));
        due
    }

    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_pending(&self, action: DeferredAction) -> bool {
        self.tasks.iter().any(|task| task.action == action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_due_returns_only_due_tasks_in_order() {
        let mut scheduler = Scheduler::default();
        scheduler.schedule(0, 10, 1, TaskGuard::Active, DeferredAction::NextQuestion);
        scheduler.schedule(0, 5, 1, TaskGuard::Active, DeferredAction::ClearBossAttack);
        scheduler.schedule(0, 5, 1, TaskGuard::Active, DeferredAction::SpawnBossProjectile { damage: 14 });
        scheduler.schedule(0, 20, 1, TaskGuard::Active, DeferredAction::ClearPlayerAttack);

        assert!(scheduler.take_due(4).is_empty());

        let due = scheduler.take_due(10);
        let actions: Vec<_> = due.iter().map(|t| t.action).collect();
        assert_eq!(
            actions,
            vec![
                DeferredAction::ClearBossAttack,
                DeferredAction::SpawnBossProjectile { damage: 14 },
                DeferredAction::NextQuestion,
            ]
        );
        assert_eq!(scheduler.pending(), 1);
        assert!(scheduler.is_pending(DeferredAction::ClearPlayerAttack));
    }

    #[test]
    fn test_cancel_all_drops_everything() {
        let mut scheduler = Scheduler::default();
        scheduler.schedule(0, 1, 1, TaskGuard::Intro, DeferredAction::BeginCombat);
        scheduler.cancel_all();
        assert_eq!(scheduler.pending(), 0);
        assert!(scheduler.take_due(100).is_empty());
    }

    #[test]
    fn test_liveness_requires_matching_epoch_and_state() {
        let mut scheduler = Scheduler::default();
        scheduler.schedule(0, 0, 3, TaskGuard::Active, DeferredAction::NextQuestion);
        let task = scheduler.take_due(0).remove(0);

        assert!(task.is_live(3, Some(TaskGuard::Active)));
        assert!(!task.is_live(4, Some(TaskGuard::Active)), "stale epoch");
        assert!(!task.is_live(3, Some(TaskGuard::Intro)), "wrong state");
        assert!(!task.is_live(3, None), "battle not running");
    }
}
