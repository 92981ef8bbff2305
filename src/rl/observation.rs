use burn::tensor::{Tensor, TensorData, backend::Backend};

use crate::game::{Direction, GameState};

/// Number of features in a state vector
pub const STATE_SIZE: usize = 11;

/// Number of discrete actions (straight, turn clockwise, turn counter-clockwise)
pub const NUM_ACTIONS: usize = 3;

/// Compact binary feature vector describing the game from the snake's view
///
/// Layout:
/// - 0: danger straight (cell ahead is blocked)
/// - 1: danger right (cell after a clockwise turn is blocked)
/// - 2: danger left (cell after a counter-clockwise turn is blocked)
/// - 3..=6: current heading one-hot (left, right, up, down)
/// - 7..=10: nearest food relative to the head (left, right, up, down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector(pub [f32; STATE_SIZE]);

impl StateVector {
    /// Convert to a rank-1 tensor of shape [11]
    pub fn to_tensor<B: Backend>(&self, device: &B::Device) -> Tensor<B, 1> {
        Tensor::from_floats(self.0, device)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

/// Encode the current game state into the 11-feature vector
pub fn encode_state(state: &GameState) -> StateVector {
    let head = state.snake.head();
    let heading = state.snake.direction;

    let danger_straight = state.is_blocked(head.moved_in_direction(heading));
    let danger_right = state.is_blocked(head.moved_in_direction(heading.clockwise()));
    let danger_left = state.is_blocked(head.moved_in_direction(heading.counter_clockwise()));

    // Food flags are all zero when the board has no food left
    let (food_left, food_right, food_up, food_down) = match state.nearest_food() {
        Some(food) => (
            food.x < head.x,
            food.x > head.x,
            food.y < head.y,
            food.y > head.y,
        ),
        None => (false, false, false, false),
    };

    StateVector([
        flag(danger_straight),
        flag(danger_right),
        flag(danger_left),
        flag(heading == Direction::Left),
        flag(heading == Direction::Right),
        flag(heading == Direction::Up),
        flag(heading == Direction::Down),
        flag(food_left),
        flag(food_right),
        flag(food_up),
        flag(food_down),
    ])
}

/// Stack state vectors into a batch tensor of shape [batch, 11]
pub fn batch_to_tensor<B: Backend>(states: &[StateVector], device: &B::Device) -> Tensor<B, 2> {
    let mut data = Vec::with_capacity(states.len() * STATE_SIZE);
    for state in states {
        data.extend_from_slice(state.as_slice());
    }

    let tensor_data = TensorData::new(data, [states.len(), STATE_SIZE]);
    Tensor::from_data(tensor_data, device)
}

fn flag(condition: bool) -> f32 {
    if condition {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameState, Position, Snake};
    use burn::backend::NdArray;
    use burn::backend::ndarray::NdArrayDevice;

    type TestBackend = NdArray<f32>;

    fn open_field_state() -> GameState {
        GameState::new(
            Snake::new(Position::new(5, 5), Direction::Right, 1),
            vec![Position::new(8, 3)],
            10,
            10,
        )
    }

    #[test]
    fn test_state_vector_length() {
        let obs = encode_state(&open_field_state());
        assert_eq!(obs.as_slice().len(), STATE_SIZE);
    }

    #[test]
    fn test_all_values_binary() {
        let obs = encode_state(&open_field_state());
        for &value in obs.as_slice() {
            assert!(value == 0.0 || value == 1.0);
        }
    }

    #[test]
    fn test_no_danger_in_open_field() {
        let obs = encode_state(&open_field_state());
        assert_eq!(&obs.as_slice()[0..3], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_danger_straight_at_wall() {
        // Head against the right wall, moving right
        let state = GameState::new(
            Snake::new(Position::new(9, 5), Direction::Right, 1),
            vec![Position::new(0, 0)],
            10,
            10,
        );

        let obs = encode_state(&state);
        assert_eq!(obs.as_slice()[0], 1.0); // straight into wall
        assert_eq!(obs.as_slice()[1], 0.0); // clockwise (down) is open
        assert_eq!(obs.as_slice()[2], 0.0); // counter-clockwise (up) is open
    }

    #[test]
    fn test_danger_sides_in_corner() {
        // Moving right along the top edge: counter-clockwise turn is the wall
        let state = GameState::new(
            Snake::new(Position::new(5, 0), Direction::Right, 1),
            vec![Position::new(0, 5)],
            10,
            10,
        );

        let obs = encode_state(&state);
        assert_eq!(obs.as_slice()[0], 0.0);
        assert_eq!(obs.as_slice()[1], 0.0); // down is open
        assert_eq!(obs.as_slice()[2], 1.0); // up is the wall
    }

    #[test]
    fn test_danger_from_own_body() {
        // Body directly above the head while moving right
        let snake = Snake {
            body: vec![
                Position::new(5, 5),
                Position::new(5, 4),
                Position::new(4, 4),
            ],
            direction: Direction::Right,
        };
        let state = GameState::new(snake, vec![Position::new(0, 0)], 10, 10);

        let obs = encode_state(&state);
        assert_eq!(obs.as_slice()[2], 1.0); // counter-clockwise from Right is Up
    }

    #[test]
    fn test_heading_one_hot() {
        for (dir, expected) in [
            (Direction::Left, [1.0, 0.0, 0.0, 0.0]),
            (Direction::Right, [0.0, 1.0, 0.0, 0.0]),
            (Direction::Up, [0.0, 0.0, 1.0, 0.0]),
            (Direction::Down, [0.0, 0.0, 0.0, 1.0]),
        ] {
            let state = GameState::new(
                Snake::new(Position::new(5, 5), dir, 1),
                vec![Position::new(8, 3)],
                10,
                10,
            );
            let obs = encode_state(&state);
            assert_eq!(&obs.as_slice()[3..7], &expected, "heading {:?}", dir);
        }
    }

    #[test]
    fn test_food_direction_flags() {
        // Food up and to the right of the head
        let obs = encode_state(&open_field_state());
        assert_eq!(&obs.as_slice()[7..11], &[0.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_food_flags_use_nearest_food() {
        let state = GameState::new(
            Snake::new(Position::new(5, 5), Direction::Right, 1),
            vec![Position::new(0, 9), Position::new(6, 5)],
            10,
            10,
        );

        // Nearest food is at (6, 5): directly right of the head
        let obs = encode_state(&state);
        assert_eq!(&obs.as_slice()[7..11], &[0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_single_tensor_shape() {
        let device = NdArrayDevice::default();
        let obs = encode_state(&open_field_state());
        let tensor = obs.to_tensor::<TestBackend>(&device);
        assert_eq!(tensor.dims(), [STATE_SIZE]);
    }

    #[test]
    fn test_batch_tensor_shape_and_content() {
        let device = NdArrayDevice::default();
        let a = StateVector([0.0; STATE_SIZE]);
        let mut ones = [0.0; STATE_SIZE];
        ones[0] = 1.0;
        let b = StateVector(ones);

        let batch = batch_to_tensor::<TestBackend>(&[a, b], &device);
        assert_eq!(batch.dims(), [2, STATE_SIZE]);

        let data = batch.to_data();
        let values = data.as_slice::<f32>().unwrap();
        assert_eq!(values[0], 0.0);
        assert_eq!(values[STATE_SIZE], 1.0);
    }
}
