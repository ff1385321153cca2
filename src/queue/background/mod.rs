//! Background threads owned by the broker: the ack-timeout/boost monitor and
//! the delayed-message release task.

pub(crate) mod delay;
pub(crate) mod monitor;
