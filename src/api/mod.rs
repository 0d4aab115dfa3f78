/*
 * Responsibility
 * - gateway 自身が返す endpoint (actuator / fallback / v1)
 * - upstream への routing は gateway framework 側の責務でここには置かない
 */
pub mod actuator;
pub mod fallback;
pub mod v1;
