use crate::ready_queue::{QueueDiscipline, SortKey};
use crate::schedulers::SchedulingPolicy;
use crate::ProcessControlBlock;

/// First-Come-First-Served: processes run their whole burst in arrival order
#[derive(Clone, Copy, Debug, Default)]
pub struct Fcfs;

impl SchedulingPolicy for Fcfs {
    fn name(&self) -> &'static str {
        "FCFS"
    }

    fn discipline(&self) -> QueueDiscipline {
        QueueDiscipline::Fifo
    }

    fn order_key(&self, _pcb: &ProcessControlBlock) -> SortKey {
        SortKey::primary(0)
    }
}
