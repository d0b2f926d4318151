use std::collections::VecDeque;

use crate::partition::Partition;

impl Partition {
    /// Check if the nodes of a district induce a connected subgraph.
    pub fn is_part_contiguous(&self, part: u32) -> bool {
        let nodes = self.part(part);
        let Some(&start) = nodes.first() else { return true };

        let mut visited = vec![false; self.num_nodes()];
        visited[start] = true;

        let mut seen = 1;
        let mut queue = VecDeque::from([start]);
        while let Some(u) = queue.pop_front() {
            for v in self.graph().neighbors(u) {
                if !visited[v] && self.assignment(v) == part {
                    visited[v] = true;
                    seen += 1;
                    queue.push_back(v);
                }
            }
        }

        seen == nodes.len()
    }

    /// Check if every district is connected.
    pub fn is_contiguous(&self) -> bool {
        (0..self.num_districts() as u32).all(|part| self.is_part_contiguous(part))
    }
}
