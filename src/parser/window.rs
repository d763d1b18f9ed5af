use std::collections::VecDeque;

use super::LogResult;

/// Buffer of accepted results that keeps only the most recent `capacity`
/// entries. A capacity of 0 keeps everything.
#[derive(Debug, Clone)]
pub struct ResultWindow {
    capacity: usize,
    buffer: VecDeque<LogResult>,
    accepted: usize,
}

impl ResultWindow {
    pub fn new(capacity: usize) -> Self {
        ResultWindow {
            capacity,
            buffer: VecDeque::new(),
            accepted: 0,
        }
    }

    pub fn push(&mut self, result: LogResult) {
        self.buffer.push_back(result);
        self.accepted += 1;

        // Keep buffer at target size
        if self.capacity > 0 {
            while self.buffer.len() > self.capacity {
                self.buffer.pop_front();
            }
        }
    }

    /// Number of results pushed, including those already dropped.
    pub fn accepted(&self) -> usize {
        self.accepted
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn into_vec(self) -> Vec<LogResult> {
        self.buffer.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(line_number: usize) -> LogResult {
        LogResult::new(line_number, format!("line {}", line_number), Vec::new())
    }

    #[test]
    fn test_keeps_trailing_window() {
        let mut window = ResultWindow::new(3);
        for n in 1..=10 {
            window.push(result(n));
        }
        assert_eq!(window.accepted(), 10);
        assert_eq!(window.len(), 3);

        let numbers: Vec<usize> = window.into_vec().iter().map(|r| r.line_number()).collect();
        assert_eq!(numbers, vec![8, 9, 10]);
    }

    #[test]
    fn test_zero_is_unlimited() {
        let mut window = ResultWindow::new(0);
        for n in 1..=100 {
            window.push(result(n));
        }
        assert_eq!(window.len(), 100);
    }

    #[test]
    fn test_fewer_than_capacity() {
        let mut window = ResultWindow::new(5);
        window.push(result(4));
        window.push(result(7));
        let numbers: Vec<usize> = window.into_vec().iter().map(|r| r.line_number()).collect();
        assert_eq!(numbers, vec![4, 7]);
    }
}
