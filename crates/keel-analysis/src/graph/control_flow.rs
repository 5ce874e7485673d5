//! Heuristic control-flow graph for a single function span.
//!
//! Lines are classified by keyword and nesting is taken from indentation.
//! This approximates block structure for Python-, Go-, Rust-, JS- and
//! Ruby-style code; it is not parser-backed and does not model
//! `switch`/`match` arms, exceptions, or multi-statement lines.

use std::sync::LazyLock;

use keel_core::errors::GraphError;
use regex::Regex;
use serde::{Deserialize, Serialize};

macro_rules! line_pattern {
    ($name:ident, $regex_str:expr) => {
        static $name: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new($regex_str).ok());
    };
}

line_pattern!(ELSE_IF_RE, r"^\}?\s*(else\s+if|elif|elsif)\b");
line_pattern!(ELSE_RE, r"^\}?\s*else\b");
line_pattern!(IF_RE, r"^(if|unless)\b");
line_pattern!(LOOP_RE, r"^(for|while|loop|until)\b");
line_pattern!(TERMINATOR_RE, r"^(return|raise|throw)\b");
line_pattern!(BREAK_RE, r"^break\b");
line_pattern!(CONTINUE_RE, r"^continue\b");
line_pattern!(CLOSE_RE, r"^(\}|end)[\s;,)]*$");
line_pattern!(COMMENT_RE, r"^(//|#|/\*|\*)");

fn is_match(re: &LazyLock<Option<Regex>>, line: &str) -> bool {
    re.as_ref().is_some_and(|r| r.is_match(line))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CfgEdgeKind {
    Sequential,
    BranchTrue,
    BranchFalse,
    LoopBack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CfgEdge {
    pub from: usize,
    pub to: usize,
    pub kind: CfgEdgeKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicBlock {
    pub id: usize,
    /// Absolute source lines covered by the block.
    pub start_line: u32,
    pub end_line: u32,
    /// Trimmed statement text, one entry per line.
    pub statements: Vec<String>,
    pub is_entry: bool,
    pub is_exit: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlFlowGraph {
    pub function_id: String,
    pub blocks: Vec<BasicBlock>,
    pub edges: Vec<CfgEdge>,
}

impl ControlFlowGraph {
    /// Block 0.
    pub fn entry(&self) -> usize {
        0
    }

    pub fn exit_blocks(&self) -> Vec<usize> {
        self.blocks.iter().filter(|b| b.is_exit).map(|b| b.id).collect()
    }

    pub fn successors(&self, block: usize) -> impl Iterator<Item = &CfgEdge> {
        self.edges.iter().filter(move |e| e.from == block)
    }

    pub fn predecessors(&self, block: usize) -> impl Iterator<Item = &CfgEdge> {
        self.edges.iter().filter(move |e| e.to == block)
    }

    pub fn count_edges(&self, kind: CfgEdgeKind) -> usize {
        self.edges.iter().filter(|e| e.kind == kind).count()
    }

    /// Block whose statements include `line`.
    pub fn block_at_line(&self, line: u32) -> Option<&BasicBlock> {
        self.blocks
            .iter()
            .find(|b| !b.statements.is_empty() && b.start_line <= line && line <= b.end_line)
    }

    /// Blocks reachable from the entry.
    pub fn reachable(&self) -> Vec<bool> {
        let mut seen = vec![false; self.blocks.len()];
        if self.blocks.is_empty() {
            return seen;
        }
        let mut stack = vec![0];
        while let Some(block) = stack.pop() {
            if std::mem::replace(&mut seen[block], true) {
                continue;
            }
            stack.extend(self.successors(block).map(|e| e.to).filter(|&to| !seen[to]));
        }
        seen
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineClass {
    If,
    ElseIf,
    Else,
    Loop,
    Terminator,
    Break,
    Continue,
    Close,
    Ignored,
    Statement,
}

fn classify(trimmed: &str) -> LineClass {
    if trimmed.is_empty() || is_match(&COMMENT_RE, trimmed) {
        LineClass::Ignored
    } else if is_match(&ELSE_IF_RE, trimmed) {
        LineClass::ElseIf
    } else if is_match(&ELSE_RE, trimmed) {
        LineClass::Else
    } else if is_match(&CLOSE_RE, trimmed) {
        LineClass::Close
    } else if is_match(&IF_RE, trimmed) {
        LineClass::If
    } else if is_match(&LOOP_RE, trimmed) {
        LineClass::Loop
    } else if is_match(&TERMINATOR_RE, trimmed) {
        LineClass::Terminator
    } else if is_match(&BREAK_RE, trimmed) {
        LineClass::Break
    } else if is_match(&CONTINUE_RE, trimmed) {
        LineClass::Continue
    } else {
        LineClass::Statement
    }
}

/// Leading whitespace width, tabs counted as four columns.
fn indentation(line: &str) -> usize {
    line.chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}

type Flow = (usize, CfgEdgeKind);

enum Frame {
    Branch {
        /// Block holding the most recent condition of the chain.
        header: usize,
        indent: usize,
        /// Arm tails waiting for the merge block.
        exits: Vec<Flow>,
        has_else: bool,
    },
    Loop {
        header: usize,
        indent: usize,
        breaks: Vec<usize>,
    },
}

impl Frame {
    fn indent(&self) -> usize {
        match self {
            Frame::Branch { indent, .. } | Frame::Loop { indent, .. } => *indent,
        }
    }
}

struct CfgBuilder {
    blocks: Vec<BasicBlock>,
    edges: Vec<CfgEdge>,
    /// Block accepting statements.
    current: Option<usize>,
    /// Flows into whichever block starts next. Non-empty only while `current` is `None`.
    pending: Vec<Flow>,
    frames: Vec<Frame>,
}

impl CfgBuilder {
    fn new() -> Self {
        Self {
            blocks: Vec::new(),
            edges: Vec::new(),
            current: None,
            pending: Vec::new(),
            frames: Vec::new(),
        }
    }

    fn add_edge(&mut self, from: usize, to: usize, kind: CfgEdgeKind) {
        let edge = CfgEdge { from, to, kind };
        if !self.edges.contains(&edge) {
            self.edges.push(edge);
        }
    }

    fn start_block(&mut self, line: u32) -> usize {
        let id = self.blocks.len();
        self.blocks.push(BasicBlock {
            id,
            start_line: line,
            end_line: line,
            statements: Vec::new(),
            is_entry: id == 0,
            is_exit: false,
        });
        for (from, kind) in std::mem::take(&mut self.pending) {
            self.add_edge(from, id, kind);
        }
        self.current = Some(id);
        id
    }

    /// Append a statement, starting a block if none is open.
    fn append(&mut self, line: u32, text: &str) -> usize {
        let id = match self.current {
            Some(id) => id,
            None => self.start_block(line),
        };
        let block = &mut self.blocks[id];
        if block.statements.is_empty() {
            block.start_line = line;
        }
        block.end_line = line;
        block.statements.push(text.to_string());
        id
    }

    /// Everything that falls out of the code seen so far.
    fn take_flow(&mut self) -> Vec<Flow> {
        let mut flow = std::mem::take(&mut self.pending);
        if let Some(current) = self.current.take() {
            flow.push((current, CfgEdgeKind::Sequential));
        }
        flow
    }

    fn close_frame(&mut self, frame: Frame) {
        match frame {
            Frame::Branch {
                header,
                mut exits,
                has_else,
                ..
            } => {
                exits.extend(self.take_flow());
                if !has_else {
                    exits.push((header, CfgEdgeKind::BranchFalse));
                }
                self.pending = exits;
            }
            Frame::Loop { header, breaks, .. } => {
                // Branch edges keep their kind; only fall-through tails loop back.
                for (tail, kind) in self.take_flow() {
                    let kind = match kind {
                        CfgEdgeKind::Sequential => CfgEdgeKind::LoopBack,
                        other => other,
                    };
                    self.add_edge(tail, header, kind);
                }
                self.pending = std::iter::once((header, CfgEdgeKind::BranchFalse))
                    .chain(breaks.into_iter().map(|b| (b, CfgEdgeKind::Sequential)))
                    .collect();
            }
        }
    }

    /// Close every construct the line at `indent` falls outside of.
    fn close_scopes(&mut self, indent: usize, class: LineClass) {
        while let Some(top) = self.frames.last() {
            if indent > top.indent() {
                break;
            }
            let continues_chain = matches!(class, LineClass::Else | LineClass::ElseIf)
                && matches!(top, Frame::Branch { indent: i, has_else: false, .. } if *i == indent);
            if continues_chain {
                break;
            }
            if let Some(frame) = self.frames.pop() {
                self.close_frame(frame);
            }
        }
    }

    fn innermost_loop_mut(&mut self) -> Option<&mut Frame> {
        self.frames.iter_mut().rev().find(|f| matches!(f, Frame::Loop { .. }))
    }

    fn process(&mut self, line: u32, raw: &str) {
        let trimmed = raw.trim();
        let class = classify(trimmed);
        if class == LineClass::Ignored {
            return;
        }
        let indent = indentation(raw);
        self.close_scopes(indent, class);

        match class {
            LineClass::Ignored | LineClass::Close => {}
            LineClass::If => self.open_branch(line, trimmed, indent),
            LineClass::ElseIf => {
                if !self.is_open_chain(indent) {
                    self.open_branch(line, trimmed, indent);
                    return;
                }
                let flow = self.take_flow();
                let header = self.chain_header(flow);
                self.pending = vec![(header, CfgEdgeKind::BranchFalse)];
                let condition = self.append(line, trimmed);
                if let Some(Frame::Branch { header, .. }) = self.frames.last_mut() {
                    *header = condition;
                }
                self.current = None;
                self.pending = vec![(condition, CfgEdgeKind::BranchTrue)];
            }
            LineClass::Else => {
                if !self.is_open_chain(indent) {
                    return;
                }
                let flow = self.take_flow();
                let header = self.chain_header(flow);
                if let Some(Frame::Branch { has_else, .. }) = self.frames.last_mut() {
                    *has_else = true;
                }
                self.pending = vec![(header, CfgEdgeKind::BranchFalse)];
            }
            LineClass::Loop => {
                if let Some(current) = self.current.take() {
                    self.pending.push((current, CfgEdgeKind::Sequential));
                }
                let header = self.append(line, trimmed);
                self.frames.push(Frame::Loop {
                    header,
                    indent,
                    breaks: Vec::new(),
                });
                self.current = None;
                self.pending = vec![(header, CfgEdgeKind::BranchTrue)];
            }
            LineClass::Terminator => {
                self.append(line, trimmed);
                self.current = None;
            }
            LineClass::Break => {
                let block = self.append(line, trimmed);
                if let Some(Frame::Loop { breaks, .. }) = self.innermost_loop_mut() {
                    breaks.push(block);
                    self.current = None;
                }
            }
            LineClass::Continue => {
                let block = self.append(line, trimmed);
                let header = match self.innermost_loop_mut() {
                    Some(Frame::Loop { header, .. }) => Some(*header),
                    _ => None,
                };
                if let Some(header) = header {
                    self.add_edge(block, header, CfgEdgeKind::LoopBack);
                    self.current = None;
                }
            }
            LineClass::Statement => {
                self.append(line, trimmed);
            }
        }
    }

    fn open_branch(&mut self, line: u32, text: &str, indent: usize) {
        let header = self.append(line, text);
        self.frames.push(Frame::Branch {
            header,
            indent,
            exits: Vec::new(),
            has_else: false,
        });
        self.current = None;
        self.pending = vec![(header, CfgEdgeKind::BranchTrue)];
    }

    fn is_open_chain(&self, indent: usize) -> bool {
        matches!(
            self.frames.last(),
            Some(Frame::Branch { indent: i, has_else: false, .. }) if *i == indent
        )
    }

    /// Park the finished arm on the open branch and return its condition block.
    fn chain_header(&mut self, arm_flow: Vec<Flow>) -> usize {
        match self.frames.last_mut() {
            Some(Frame::Branch { header, exits, .. }) => {
                exits.extend(arm_flow);
                *header
            }
            _ => 0,
        }
    }

    fn finish(mut self, function_id: &str, end_line: u32) -> ControlFlowGraph {
        while let Some(frame) = self.frames.pop() {
            self.close_frame(frame);
        }
        if self.blocks.is_empty() || !self.pending.is_empty() {
            // Shared exit for flows still open at the end of the span.
            self.start_block(end_line);
        }

        let mut graph = ControlFlowGraph {
            function_id: function_id.to_string(),
            blocks: self.blocks,
            edges: self.edges,
        };
        let reachable = graph.reachable();
        let has_successor: Vec<bool> = (0..graph.blocks.len())
            .map(|id| graph.edges.iter().any(|e| e.from == id))
            .collect();
        for block in &mut graph.blocks {
            block.is_exit = reachable[block.id] && !has_successor[block.id];
        }
        graph
    }
}

/// Build the control-flow graph of the function spanning
/// `start_line..=end_line`. `source` holds that span's text; lines past the
/// span are ignored.
pub fn build_control_flow_graph(
    function_id: &str,
    start_line: u32,
    end_line: u32,
    source: &str,
) -> Result<ControlFlowGraph, GraphError> {
    if end_line < start_line {
        return Err(GraphError::InvalidLineRange {
            function_id: function_id.to_string(),
            start_line,
            end_line,
        });
    }

    let span = (end_line - start_line) as usize + 1;
    let mut builder = CfgBuilder::new();
    for (offset, raw) in source.lines().take(span).enumerate() {
        builder.process(start_line + offset as u32, raw);
    }
    let graph = builder.finish(function_id, end_line);

    tracing::debug!(
        function_id,
        blocks = graph.blocks.len(),
        edges = graph.edges.len(),
        "built control flow graph"
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify("if x > 0:"), LineClass::If);
        assert_eq!(classify("} else if (y) {"), LineClass::ElseIf);
        assert_eq!(classify("elif y:"), LineClass::ElseIf);
        assert_eq!(classify("} else {"), LineClass::Else);
        assert_eq!(classify("for i in range(3):"), LineClass::Loop);
        assert_eq!(classify("loop {"), LineClass::Loop);
        assert_eq!(classify("return None"), LineClass::Terminator);
        assert_eq!(classify("});"), LineClass::Close);
        assert_eq!(classify("end"), LineClass::Close);
        assert_eq!(classify("# note"), LineClass::Ignored);
        assert_eq!(classify("iffy = 1"), LineClass::Statement);
        assert_eq!(classify("ending = 2"), LineClass::Statement);
    }

    #[test]
    fn test_indentation_counts_tabs() {
        assert_eq!(indentation("\t\tx"), 8);
        assert_eq!(indentation("  y"), 2);
    }

    #[test]
    fn test_straight_line_is_one_block() {
        let cfg = build_control_flow_graph("f", 1, 3, "a = 1\nb = 2\nreturn a + b").unwrap();
        assert_eq!(cfg.blocks.len(), 1);
        assert!(cfg.blocks[0].is_entry && cfg.blocks[0].is_exit);
        assert_eq!(cfg.blocks[0].statements.len(), 3);
        assert!(cfg.edges.is_empty());
    }

    #[test]
    fn test_empty_span() {
        let cfg = build_control_flow_graph("f", 5, 5, "").unwrap();
        assert_eq!(cfg.blocks.len(), 1);
        assert!(cfg.blocks[0].is_entry);
        assert!(cfg.blocks[0].is_exit);
    }

    #[test]
    fn test_invalid_range() {
        let err = build_control_flow_graph("f", 9, 3, "x").unwrap_err();
        assert!(matches!(err, GraphError::InvalidLineRange { start_line: 9, end_line: 3, .. }));
    }
}
