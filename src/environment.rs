//! Interface to the simulation that networks drive.

/// A world in which each individual controls one agent.
///
/// Every tick the driver calls [`sense`](Self::sense), feeds the readings to
/// the network, runs one update and hands the outputs to
/// [`act`](Self::act), which also advances the agent. Agents never share
/// mutable state, so a round can be evaluated for all individuals in
/// parallel.
pub trait Environment: Sync {
    type Agent: Send;

    /// Sensor slots written each tick
    fn input_count(&self) -> usize;

    /// Actuator slots read each tick
    fn output_count(&self) -> usize;

    /// Create a fresh agent at the start of a round
    fn spawn(&self, agent_id: u32) -> Self::Agent;

    /// Fill `inputs` with the agent's current sensor readings
    fn sense(&self, agent: &Self::Agent, inputs: &mut [f32]);

    /// Apply network outputs and advance the agent by one tick
    fn act(&self, agent: &mut Self::Agent, outputs: &[f32]);

    /// Score at the end of the round, higher is better
    fn fitness(&self, agent: &Self::Agent) -> f32;

    /// Stop ticking this agent early
    fn is_done(&self, _agent: &Self::Agent) -> bool {
        false
    }
}
