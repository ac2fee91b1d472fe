use std::collections::HashSet;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::activation::Activation;
use crate::error::{NeatError, Result};

/// Genome-local node identifier.
pub type NodeId = u32;

/// Historical marking of a connection, shared across genomes.
pub type Innovation = u64;

/// Classification of a node gene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Sensor,
    Bias,
    Hidden,
    Output,
}

impl NodeKind {
    /// Sensor and bias nodes feed the network and take no incoming edges.
    pub fn is_input(self) -> bool {
        matches!(self, NodeKind::Sensor | NodeKind::Bias)
    }
}

/// Gene describing a single neuron.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeGene {
    id: NodeId,
    kind: NodeKind,
    activation: Activation,
}

impl NodeGene {
    pub fn new(id: NodeId, kind: NodeKind, activation: Activation) -> Self {
        Self {
            id,
            kind,
            activation,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }
}

/// Gene describing a directed edge between two nodes of one genome.
///
/// Endpoints are node ids, never references, so connections from different
/// genomes can be compared. Two connections are homologous when their
/// innovation numbers match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnGene {
    innovation: Innovation,
    input: NodeId,
    output: NodeId,
}

impl ConnGene {
    pub fn new(innovation: Innovation, input: NodeId, output: NodeId) -> Self {
        Self {
            innovation,
            input,
            output,
        }
    }

    pub fn innovation(&self) -> Innovation {
        self.innovation
    }

    /// Id of the source node.
    pub fn input(&self) -> NodeId {
        self.input
    }

    /// Id of the destination node.
    pub fn output(&self) -> NodeId {
        self.output
    }

    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.input, self.output)
    }
}

/// Sensor and output counts of a minimal genome, checked against the id and
/// innovation ranges.
///
/// A shape guarantees that every id up to and including the bias id, plus
/// one, fits in [`NodeId`], and that the `(S+1)×O` initial edges can be
/// numbered with [`Innovation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenomeShape {
    sensors: NodeId,
    outputs: NodeId,
    conns: Innovation,
}

impl GenomeShape {
    pub fn new(num_sensors: usize, num_outputs: usize) -> Result<Self> {
        let too_many_nodes = || {
            NeatError::invalid_config(format!(
                "{} sensors and {} outputs exceed the node id range",
                num_sensors, num_outputs
            ))
        };
        let sensors = NodeId::try_from(num_sensors).map_err(|_| too_many_nodes())?;
        let outputs = NodeId::try_from(num_outputs).map_err(|_| too_many_nodes())?;
        // S + 1 + O ids, and the bias id S + O leaves room for one more.
        sensors
            .checked_add(outputs)
            .and_then(|n| n.checked_add(1))
            .ok_or_else(too_many_nodes)?;
        let conns = Innovation::from(sensors)
            .checked_add(1)
            .and_then(|n| n.checked_mul(Innovation::from(outputs)))
            .ok_or_else(|| {
                NeatError::invalid_config(format!(
                    "{} sensors and {} outputs exceed the innovation range",
                    num_sensors, num_outputs
                ))
            })?;
        Ok(Self {
            sensors,
            outputs,
            conns,
        })
    }

    pub fn num_sensors(&self) -> usize {
        self.sensors as usize
    }

    pub fn num_outputs(&self) -> usize {
        self.outputs as usize
    }

    /// Sensors, bias and outputs.
    pub fn num_nodes(&self) -> usize {
        self.num_sensors() + 1 + self.num_outputs()
    }

    /// Number of initial edges, `(S+1)×O`.
    pub fn num_conns(&self) -> Innovation {
        self.conns
    }

    pub fn bias_id(&self) -> NodeId {
        self.sensors + self.outputs
    }
}

/// Topology of one candidate network.
///
/// Nodes and connections are kept in creation order. The sensor, output and
/// hidden counts are cached alongside the node list and are kept in step by
/// every edit this type exposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    num_sensors: usize,
    num_outputs: usize,
    num_hidden: usize,
    nodes: Vec<NodeGene>,
    conns: Vec<ConnGene>,
}

impl Genome {
    /// Build the minimal fully connected genome.
    ///
    /// Sensors take ids `0..S`, outputs `S..S+O` and the bias node takes the
    /// last id, `S+O`. Nodes are stored sensors first, then bias, then
    /// outputs. Every output receives one edge from each sensor and from the
    /// bias; edge `k` in creation order gets innovation `first_innovation + k`.
    pub fn minimal(
        shape: GenomeShape,
        output_activation: Activation,
        first_innovation: Innovation,
    ) -> Self {
        let sensors = shape.sensors;
        let bias = shape.bias_id();

        let mut nodes = Vec::with_capacity(shape.num_nodes());
        nodes.extend(
            (0..sensors).map(|id| NodeGene::new(id, NodeKind::Sensor, Activation::Identity)),
        );
        nodes.push(NodeGene::new(bias, NodeKind::Bias, Activation::Identity));
        nodes.extend(
            (sensors..bias).map(|id| NodeGene::new(id, NodeKind::Output, output_activation)),
        );

        // Capacity is only a hint; a count beyond usize leaves it to grow.
        let mut conns = Vec::with_capacity(usize::try_from(shape.num_conns()).unwrap_or_default());
        let mut innovation = first_innovation;
        for out in sensors..bias {
            for input in (0..sensors).chain(std::iter::once(bias)) {
                conns.push(ConnGene::new(innovation, input, out));
                innovation += 1;
            }
        }

        Self {
            num_sensors: shape.num_sensors(),
            num_outputs: shape.num_outputs(),
            num_hidden: 0,
            nodes,
            conns,
        }
    }

    pub fn num_sensors(&self) -> usize {
        self.num_sensors
    }

    pub fn num_outputs(&self) -> usize {
        self.num_outputs
    }

    pub fn num_hidden(&self) -> usize {
        self.num_hidden
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_conns(&self) -> usize {
        self.conns.len()
    }

    pub fn nodes(&self) -> &[NodeGene] {
        &self.nodes
    }

    pub fn conns(&self) -> &[ConnGene] {
        &self.conns
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeGene> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Connection carrying the given innovation number, if present.
    pub fn conn(&self, innovation: Innovation) -> Option<&ConnGene> {
        self.conns.iter().find(|c| c.innovation == innovation)
    }

    pub fn has_conn(&self, input: NodeId, output: NodeId) -> bool {
        self.conns
            .iter()
            .any(|c| c.input == input && c.output == output)
    }

    /// One past the largest node id in use. Ids are never reused.
    pub fn next_node_id(&self) -> NodeId {
        self.nodes.iter().map(|n| n.id + 1).max().unwrap_or(0)
    }

    /// Append a hidden node and return its id.
    pub fn add_hidden_node(&mut self, activation: Activation) -> NodeId {
        let id = self.next_node_id();
        self.nodes.push(NodeGene::new(id, NodeKind::Hidden, activation));
        self.num_hidden += 1;
        id
    }

    /// Append a connection. Rejects dangling endpoints, a second edge for the
    /// same ordered pair and a repeated innovation number; the genome is left
    /// untouched on error.
    pub fn add_conn(&mut self, conn: ConnGene) -> Result<()> {
        for node in [conn.input, conn.output] {
            if self.node(node).is_none() {
                debug!("rejecting connection {}: node {} missing", conn.innovation, node);
                return Err(NeatError::DanglingConnection {
                    innovation: conn.innovation,
                    node,
                });
            }
        }
        if self.has_conn(conn.input, conn.output) {
            debug!("rejecting duplicate edge {}->{}", conn.input, conn.output);
            return Err(NeatError::DuplicateConnection {
                input: conn.input,
                output: conn.output,
            });
        }
        if self.conn(conn.innovation).is_some() {
            debug!("rejecting repeated innovation {}", conn.innovation);
            return Err(NeatError::DuplicateInnovation(conn.innovation));
        }
        self.conns.push(conn);
        Ok(())
    }

    /// Check every structural invariant of the genome.
    pub fn validate(&self) -> Result<()> {
        let mut ids = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !ids.insert(node.id) {
                return Err(NeatError::DuplicateNode(node.id));
            }
        }

        let count = |kind: NodeKind| self.nodes.iter().filter(|n| n.kind == kind).count();
        for (name, kind, cached) in [
            ("sensor", NodeKind::Sensor, self.num_sensors),
            ("output", NodeKind::Output, self.num_outputs),
            ("hidden", NodeKind::Hidden, self.num_hidden),
            ("bias", NodeKind::Bias, 1),
        ] {
            let actual = count(kind);
            if actual != cached {
                return Err(NeatError::CountMismatch {
                    kind: name,
                    cached,
                    actual,
                });
            }
        }

        let mut pairs = HashSet::with_capacity(self.conns.len());
        let mut innovations = HashSet::with_capacity(self.conns.len());
        for conn in &self.conns {
            for node in [conn.input, conn.output] {
                if !ids.contains(&node) {
                    return Err(NeatError::DanglingConnection {
                        innovation: conn.innovation,
                        node,
                    });
                }
            }
            if !pairs.insert(conn.endpoints()) {
                return Err(NeatError::DuplicateConnection {
                    input: conn.input,
                    output: conn.output,
                });
            }
            if !innovations.insert(conn.innovation) {
                return Err(NeatError::DuplicateInnovation(conn.innovation));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal(sensors: usize, outputs: usize, act: Activation, first: Innovation) -> Genome {
        Genome::minimal(GenomeShape::new(sensors, outputs).unwrap(), act, first)
    }

    #[test]
    fn minimal_layout() {
        let genome = minimal(2, 1, Activation::Sigmoid, 0);
        assert_eq!(genome.num_nodes(), 4);
        assert_eq!(genome.num_conns(), 3);
        assert_eq!(genome.num_hidden(), 0);

        let layout: Vec<(NodeId, NodeKind)> =
            genome.nodes().iter().map(|n| (n.id(), n.kind())).collect();
        assert_eq!(
            layout,
            vec![
                (0, NodeKind::Sensor),
                (1, NodeKind::Sensor),
                (3, NodeKind::Bias),
                (2, NodeKind::Output),
            ]
        );
        assert_eq!(genome.node(3).unwrap().activation(), Activation::Identity);
        assert_eq!(genome.node(2).unwrap().activation(), Activation::Sigmoid);
        let inputs = genome.nodes().iter().filter(|n| n.kind().is_input()).count();
        assert_eq!(inputs, 3);

        let edges: Vec<(Innovation, NodeId, NodeId)> = genome
            .conns()
            .iter()
            .map(|c| (c.innovation(), c.input(), c.output()))
            .collect();
        assert_eq!(edges, vec![(0, 0, 2), (1, 1, 2), (2, 3, 2)]);
        assert!(genome.validate().is_ok());
    }

    #[test]
    fn minimal_innovations_start_at_offset() {
        let genome = minimal(3, 2, Activation::Tanh, 10);
        let innovs: Vec<Innovation> = genome.conns().iter().map(|c| c.innovation()).collect();
        assert_eq!(innovs, (10..18).collect::<Vec<_>>());
        assert_eq!(genome.next_node_id(), 6);
    }

    #[test]
    fn shape_rejects_out_of_range_counts() {
        let shape = GenomeShape::new(3, 2).unwrap();
        assert_eq!(shape.num_nodes(), 6);
        assert_eq!(shape.num_conns(), 8);
        assert_eq!(shape.bias_id(), 5);

        let largest = GenomeShape::new(u32::MAX as usize - 2, 1).unwrap();
        assert_eq!(largest.bias_id(), u32::MAX - 1);

        for (s, o) in [
            (u32::MAX as usize, 1),
            (u32::MAX as usize - 1, 1),
            (1, u32::MAX as usize),
            (usize::MAX, 1),
        ] {
            assert!(matches!(
                GenomeShape::new(s, o),
                Err(NeatError::InvalidConfig { .. })
            ));
        }
    }

    #[test]
    fn add_hidden_node_extends_ids() {
        let mut genome = minimal(2, 2, Activation::Sigmoid, 0);
        let h = genome.add_hidden_node(Activation::ReLU);
        assert_eq!(h, 5);
        assert_eq!(genome.num_hidden(), 1);
        assert_eq!(genome.node(h).unwrap().kind(), NodeKind::Hidden);
        assert_eq!(genome.add_hidden_node(Activation::Abs), 6);
        assert!(genome.validate().is_ok());
    }

    #[test]
    fn add_conn_rejects_bad_edges() {
        let mut genome = minimal(2, 1, Activation::Sigmoid, 0);
        let h = genome.add_hidden_node(Activation::Tanh);

        assert_eq!(
            genome.add_conn(ConnGene::new(3, 0, 9)),
            Err(NeatError::DanglingConnection {
                innovation: 3,
                node: 9
            })
        );
        assert_eq!(
            genome.add_conn(ConnGene::new(3, 1, 2)),
            Err(NeatError::DuplicateConnection { input: 1, output: 2 })
        );
        assert_eq!(
            genome.add_conn(ConnGene::new(0, 0, h)),
            Err(NeatError::DuplicateInnovation(0))
        );
        assert_eq!(genome.num_conns(), 3);

        genome.add_conn(ConnGene::new(3, 0, h)).unwrap();
        genome.add_conn(ConnGene::new(4, h, 2)).unwrap();
        assert_eq!(genome.num_conns(), 5);
        assert_eq!(genome.conn(4).unwrap().endpoints(), (h, 2));
        assert!(genome.validate().is_ok());
    }

    #[test]
    fn validate_reports_broken_state() {
        let mut genome = minimal(1, 1, Activation::Sigmoid, 0);
        genome.conns.push(ConnGene::new(7, 0, 1));
        assert_eq!(
            genome.validate(),
            Err(NeatError::DuplicateConnection { input: 0, output: 1 })
        );

        let mut genome = minimal(1, 1, Activation::Sigmoid, 0);
        genome.conns.push(ConnGene::new(7, 1, 4));
        assert_eq!(
            genome.validate(),
            Err(NeatError::DanglingConnection {
                innovation: 7,
                node: 4
            })
        );

        let mut genome = minimal(1, 1, Activation::Sigmoid, 0);
        genome
            .nodes
            .push(NodeGene::new(0, NodeKind::Hidden, Activation::Abs));
        assert_eq!(genome.validate(), Err(NeatError::DuplicateNode(0)));

        let mut genome = minimal(1, 1, Activation::Sigmoid, 0);
        genome.num_hidden = 2;
        assert_eq!(
            genome.validate(),
            Err(NeatError::CountMismatch {
                kind: "hidden",
                cached: 2,
                actual: 0
            })
        );
    }

    #[test]
    fn clones_are_independent() {
        let original = minimal(2, 1, Activation::Sigmoid, 0);
        let mut copy = original.clone();
        copy.add_hidden_node(Activation::Tanh);
        assert_eq!(original.num_nodes(), 4);
        assert_eq!(copy.num_nodes(), 5);
    }
}
