//! 导出树构建器
//!
//! 先建立壳程序自身的导出项以及供模块挂载的占位节点，再按目录中的 order
//! 依次合并每个已启用模块的导出声明，最后处理同级节点的标题冲突。
//!
//! 每次构建都从一棵新树开始，不做增量修补。

use super::metadata::{ExportDeclaration, ExportManifest};
use super::registry::ModuleRegistry;
use crate::core::catalog::Catalog;
use crate::types::{capitalize, eq_ignore_case, ModuleStatus};
use crate::{PluginShellError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// 根节点 id
pub const ROOT_ID: &str = ".";
/// 根节点 tag
pub const ROOT_TAG: &str = "all";

/// 导出树节点
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportNode {
    pub id: String,
    pub tag: String,
    pub title: String,
    pub extends: String,
    pub order: i64,
    /// 贡献该节点的模块 id，壳程序节点为空
    pub area: String,
    /// 由路径段合成、尚未被声明填充的节点
    pub placeholder: bool,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ExportNode>,
}

impl ExportNode {
    /// 壳程序根节点
    pub fn root() -> Self {
        Self {
            id: ROOT_ID.to_string(),
            tag: ROOT_TAG.to_string(),
            title: String::new(),
            extends: String::new(),
            order: 0,
            area: String::new(),
            placeholder: false,
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    fn placeholder(segment: &str, tag: &str, order: i64, extends: String) -> Self {
        Self {
            id: segment.to_string(),
            tag: tag.to_string(),
            title: capitalize(segment),
            extends,
            order,
            area: String::new(),
            placeholder: true,
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    fn from_declaration(declaration: &ExportDeclaration, tag: &str, area: &str, order: i64) -> Self {
        let mut node = Self {
            id: declaration.id.clone().unwrap_or_default(),
            tag: tag.to_string(),
            title: String::new(),
            extends: declaration.extends.clone(),
            order,
            area: String::new(),
            placeholder: false,
            attributes: BTreeMap::new(),
            children: Vec::new(),
        };
        node.fill(declaration, area, order);
        node
    }

    /// 用声明内容填充节点，保留子节点
    fn fill(&mut self, declaration: &ExportDeclaration, area: &str, order: i64) {
        self.title = declaration.title.clone();
        self.extends = declaration.extends.clone();
        self.order = order;
        self.area = area.to_string();
        self.placeholder = false;
        self.attributes = declaration
            .attributes
            .iter()
            .filter(|(key, _)| !key.eq_ignore_ascii_case("area"))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
    }

    fn prefix_title_with_area(&mut self) {
        if self.area.trim().is_empty() {
            return;
        }
        self.title = format!("{}: {}", capitalize(&self.area), self.title);
    }

    fn matches_segment(&self, segment: &str, tag: &str) -> bool {
        eq_ignore_case(&self.id, segment) && eq_ignore_case(&self.tag, tag)
    }

    /// 按 id 路径查找后代节点，例如 `menu/tools`
    pub fn find_path(&self, path: &str) -> Option<&ExportNode> {
        let mut current = self;
        for segment in path.split('/').map(str::trim).filter(|s| !s.is_empty()) {
            if segment == ROOT_ID {
                continue;
            }
            current = current
                .children
                .iter()
                .find(|child| eq_ignore_case(&child.id, segment))?;
        }
        Some(current)
    }

    pub fn children_with_tag(&self, tag: &str) -> Vec<&ExportNode> {
        self.children
            .iter()
            .filter(|child| eq_ignore_case(&child.tag, tag))
            .collect()
    }

    /// 深度优先前序遍历，包含自身
    pub fn walk(&self) -> Vec<&ExportNode> {
        let mut nodes = vec![self];
        for child in &self.children {
            nodes.extend(child.walk());
        }
        nodes
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ExportNode::node_count).sum::<usize>()
    }
}

/// 在第一个 order 严格更大的兄弟之前插入，否则追加到末尾；返回插入位置
fn insert_ordered(children: &mut Vec<ExportNode>, node: ExportNode) -> usize {
    match children.iter().position(|child| node.order < child.order) {
        Some(index) => {
            children.insert(index, node);
            index
        }
        None => {
            children.push(node);
            children.len() - 1
        }
    }
}

/// 已存在的节点换了 order 后重新定位：排在所有 order 更小的兄弟之后、
/// 第一个 order 不小于它的兄弟之前
fn reposition(children: &mut Vec<ExportNode>, node: ExportNode) {
    let index = children
        .iter()
        .position(|child| child.order >= node.order)
        .unwrap_or(children.len());
    children.insert(index, node);
}

fn node_at_mut<'a>(root: &'a mut ExportNode, path: &[usize]) -> &'a mut ExportNode {
    let mut node = root;
    for &index in path {
        node = &mut node.children[index];
    }
    node
}

/// 导出树构建器
#[derive(Debug)]
pub struct ExportTreeBuilder {
    root: ExportNode,
}

impl Default for ExportTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportTreeBuilder {
    pub fn new() -> Self {
        Self {
            root: ExportNode::root(),
        }
    }

    /// 将一份清单合并进树，`area` 为贡献模块 id（壳程序为空）
    pub fn ingest(&mut self, manifest: &ExportManifest, area: &str) -> Result<()> {
        for declaration in &manifest.exports {
            self.ingest_declaration(declaration, area)?;
        }
        Ok(())
    }

    fn ingest_declaration(&mut self, declaration: &ExportDeclaration, area: &str) -> Result<()> {
        let tag = declaration.tag.trim();
        if tag.is_empty() {
            return Err(PluginShellError::configuration(&format!(
                "export '{}' in area '{}' has an empty tag",
                declaration.title, area
            )));
        }

        // 第一阶段：沿 extends 路径下行，缺失的段合成占位节点
        let segments = declaration.extends_path();
        let mut cursor: Vec<usize> = Vec::new();
        for (position, segment) in segments.iter().enumerate() {
            if *segment == ROOT_ID {
                cursor.clear();
                continue;
            }

            let parent = node_at_mut(&mut self.root, &cursor);
            let index = match parent
                .children
                .iter()
                .position(|child| child.matches_segment(segment, tag))
            {
                Some(index) => index,
                None => {
                    let order = parent.children.len() as i64 + 1;
                    let extends = segments[..position].join("/");
                    let placeholder = ExportNode::placeholder(segment, tag, order, extends);
                    insert_ordered(&mut parent.children, placeholder)
                }
            };
            cursor.push(index);
        }

        // 第二阶段：填充同名占位节点，或按 order 插入新节点
        let parent = node_at_mut(&mut self.root, &cursor);
        let placeholder_index = declaration.id.as_deref().and_then(|id| {
            parent
                .children
                .iter()
                .position(|child| child.placeholder && child.matches_segment(id, tag))
        });

        match placeholder_index {
            Some(index) => {
                let placeholder_order = parent.children[index].order;
                let order = declaration.order.unwrap_or(placeholder_order);
                debug!("Export '{}' fills placeholder in area '{}'", parent.children[index].id, area);
                if order == placeholder_order {
                    parent.children[index].fill(declaration, area, order);
                } else {
                    let mut node = parent.children.remove(index);
                    node.fill(declaration, area, order);
                    reposition(&mut parent.children, node);
                }
            }
            None => {
                let order = declaration
                    .order
                    .unwrap_or(parent.children.len() as i64 + 1);
                let node = ExportNode::from_declaration(declaration, tag, area, order);
                insert_ordered(&mut parent.children, node);
            }
        }
        Ok(())
    }

    /// 处理标题冲突并返回完成的树
    pub fn finish(mut self) -> ExportNode {
        resolve_name_conflicts(&mut self.root);
        self.root
    }
}

/// 深度优先处理同级标题冲突：与后续兄弟标题相同（不区分大小写）时，
/// 双方标题都加上各自 area 前缀，壳程序节点不加前缀
fn resolve_name_conflicts(node: &mut ExportNode) {
    for index in 0..node.children.len() {
        resolve_name_conflicts(&mut node.children[index]);

        let (head, tail) = node.children.split_at_mut(index + 1);
        let current = &mut head[index];
        let mut current_must_change = false;
        for sibling in tail.iter_mut() {
            if eq_ignore_case(&current.title, &sibling.title) {
                current_must_change = true;
                sibling.prefix_title_with_area();
            }
        }

        if current_must_change {
            current.prefix_title_with_area();
        }
    }
}

/// 用壳清单和当前目录快照构建完整导出树
///
/// 目录记录按 order 排序；只有状态为 Active 且已注册描述符的模块参与合并。
pub fn build_export_tree(
    shell: &ExportManifest,
    catalog: &Catalog,
    registry: &ModuleRegistry,
) -> Result<ExportNode> {
    let mut builder = ExportTreeBuilder::new();
    builder.ingest(shell, "")?;

    for record in catalog.ordered() {
        if record.status != ModuleStatus::Active {
            continue;
        }
        match registry.find(&record.id) {
            Some(descriptor) => builder.ingest(&descriptor.manifest, &record.id)?,
            None => debug!("Active module '{}' has no registered descriptor", record.id),
        }
    }

    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::ModuleRecord;
    use crate::plugins::core::ModuleDescriptor;

    fn decl(tag: &str, extends: &str, title: &str) -> ExportDeclaration {
        ExportDeclaration::new(tag, extends, title)
    }

    fn registry_with(modules: Vec<(&str, Vec<ExportDeclaration>)>) -> ModuleRegistry {
        let registry = ModuleRegistry::new();
        for (id, exports) in modules {
            registry.register(ModuleDescriptor::embedded(id, ExportManifest::new(exports)));
        }
        registry
    }

    fn active(id: &str, order: i64) -> ModuleRecord {
        ModuleRecord::new(id, order, ModuleStatus::Active)
    }

    fn titles(node: &ExportNode) -> Vec<String> {
        node.children.iter().map(|c| c.title.clone()).collect()
    }

    fn assert_order_invariant(node: &ExportNode) {
        for pair in node.children.windows(2) {
            assert!(
                pair[0].order <= pair[1].order,
                "children of '{}' out of order: {} > {}",
                node.id,
                pair[0].order,
                pair[1].order
            );
        }
        for child in &node.children {
            assert_order_invariant(child);
        }
    }

    #[test]
    fn test_shell_home_and_module_home_conflict() {
        let shell = ExportManifest::new(vec![decl("nav", "", "Home")]);
        let registry = registry_with(vec![
            ("A", vec![decl("nav", ".", "Home")]),
            ("B", vec![]),
        ]);
        let catalog = Catalog::new(vec![active("A", 1), active("B", 2)]);

        let tree = build_export_tree(&shell, &catalog, &registry).unwrap();

        let nav = tree.children_with_tag("nav");
        assert_eq!(nav.len(), 2);
        assert_eq!(nav[0].title, "Home");
        assert_eq!(nav[0].area, "");
        assert_eq!(nav[1].title, "A: Home");
        assert_eq!(nav[1].area, "A");
    }

    #[test]
    fn test_conflicting_module_titles_are_prefixed_in_order() {
        let shell = ExportManifest::default();
        let registry = registry_with(vec![
            ("Alpha", vec![decl("nav", "", "Reports")]),
            ("Beta", vec![decl("nav", "", "reports")]),
        ]);
        let catalog = Catalog::new(vec![active("Beta", 2), active("Alpha", 1)]);

        let tree = build_export_tree(&shell, &catalog, &registry).unwrap();
        assert_eq!(titles(&tree), vec!["Alpha: Reports", "Beta: reports"]);
    }

    #[test]
    fn test_area_prefix_is_capitalized() {
        let shell = ExportManifest::default();
        let registry = registry_with(vec![
            ("alpha", vec![decl("nav", "", "Home")]),
            ("beta", vec![decl("nav", "", "Home")]),
        ]);
        let catalog = Catalog::new(vec![active("alpha", 1), active("beta", 2)]);

        let tree = build_export_tree(&shell, &catalog, &registry).unwrap();
        assert_eq!(titles(&tree), vec!["Alpha: Home", "Beta: Home"]);
    }

    #[test]
    fn test_three_way_conflict_prefixes_every_module_node_once() {
        let shell = ExportManifest::new(vec![decl("nav", "", "Help")]);
        let registry = registry_with(vec![
            ("a", vec![decl("nav", "", "Help")]),
            ("b", vec![decl("nav", "", "Help")]),
        ]);
        let catalog = Catalog::new(vec![active("a", 1), active("b", 2)]);

        let tree = build_export_tree(&shell, &catalog, &registry).unwrap();
        assert_eq!(titles(&tree), vec!["Help", "A: Help", "B: Help"]);
    }

    #[test]
    fn test_placeholder_is_shared_across_modules() {
        let shell = ExportManifest::default();
        let registry = registry_with(vec![
            ("one", vec![decl("nav", "menu", "First")]),
            ("two", vec![decl("nav", "menu", "Second")]),
        ]);
        let catalog = Catalog::new(vec![active("one", 1), active("two", 2)]);

        let tree = build_export_tree(&shell, &catalog, &registry).unwrap();
        assert_eq!(tree.children.len(), 1);

        let menu = &tree.children[0];
        assert_eq!(menu.id, "menu");
        assert_eq!(menu.title, "Menu");
        assert_eq!(menu.tag, "nav");
        assert!(menu.placeholder);
        assert_eq!(titles(menu), vec!["First", "Second"]);
    }

    #[test]
    fn test_placeholder_is_per_tag() {
        let shell = ExportManifest::default();
        let registry = registry_with(vec![(
            "one",
            vec![decl("nav", "menu", "Nav item"), decl("admin", "menu", "Admin item")],
        )]);
        let catalog = Catalog::new(vec![active("one", 1)]);

        let tree = build_export_tree(&shell, &catalog, &registry).unwrap();
        assert_eq!(tree.children.len(), 2);
        assert_eq!(tree.children[0].tag, "nav");
        assert_eq!(tree.children[1].tag, "admin");
    }

    #[test]
    fn test_nested_placeholders_record_their_extends_path() {
        let mut builder = ExportTreeBuilder::new();
        builder
            .ingest(
                &ExportManifest::new(vec![decl("nav", "menu/tools/more", "Deep")]),
                "mod",
            )
            .unwrap();
        let tree = builder.finish();

        let tools = tree.find_path("menu/tools").unwrap();
        assert_eq!(tools.extends, "menu");
        assert_eq!(tools.title, "Tools");
        let more = tree.find_path("menu/tools/more").unwrap();
        assert_eq!(more.extends, "menu/tools");
        assert_eq!(more.children[0].title, "Deep");
        assert_eq!(more.children[0].area, "mod");
        assert_eq!(tree.node_count(), 5);
    }

    #[test]
    fn test_dot_segment_reanchors_at_root() {
        let mut builder = ExportTreeBuilder::new();
        builder
            .ingest(
                &ExportManifest::new(vec![
                    decl("nav", "menu", "In menu"),
                    decl("nav", "menu/./side", "In side"),
                ]),
                "",
            )
            .unwrap();
        let tree = builder.finish();

        let ids: Vec<&str> = tree.children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["menu", "side"]);
        assert_eq!(titles(&tree.children[1]), vec!["In side"]);
    }

    #[test]
    fn test_shell_declared_node_is_extended_by_modules() {
        let shell = ExportManifest::new(vec![
            decl("nav", "", "Main Menu").with_id("menu").with_order(1),
            decl("nav", "", "Account").with_id("account").with_order(2),
        ]);
        let registry = registry_with(vec![("reports", vec![decl("nav", "menu", "Reports")])]);
        let catalog = Catalog::new(vec![active("reports", 1)]);

        let tree = build_export_tree(&shell, &catalog, &registry).unwrap();
        assert_eq!(titles(&tree), vec!["Main Menu", "Account"]);
        assert!(!tree.children[0].placeholder);
        assert_eq!(titles(&tree.children[0]), vec!["Reports"]);
    }

    #[test]
    fn test_declaration_fills_earlier_placeholder() {
        let registry = registry_with(vec![
            ("tools", vec![decl("nav", "admin", "Tool A")]),
            (
                "admin",
                vec![decl("nav", "", "Administration")
                    .with_id("admin")
                    .with_attribute("icon", serde_json::json!("gear"))],
            ),
        ]);
        let catalog = Catalog::new(vec![active("tools", 1), active("admin", 2)]);

        let tree = build_export_tree(&ExportManifest::default(), &catalog, &registry).unwrap();
        assert_eq!(tree.children.len(), 1);

        let admin = &tree.children[0];
        assert!(!admin.placeholder);
        assert_eq!(admin.title, "Administration");
        assert_eq!(admin.area, "admin");
        assert_eq!(admin.attributes.get("icon"), Some(&serde_json::json!("gear")));
        assert_eq!(titles(admin), vec!["Tool A"]);
    }

    #[test]
    fn test_fill_without_order_keeps_placeholder_position() {
        let registry = registry_with(vec![(
            "admin",
            vec![
                decl("nav", "admin", "Users"),
                decl("nav", "", "Other").with_order(1),
                decl("nav", "", "Administration").with_id("admin"),
            ],
        )]);
        let catalog = Catalog::new(vec![active("admin", 1)]);

        let tree = build_export_tree(&ExportManifest::default(), &catalog, &registry).unwrap();
        let children: Vec<(&str, i64)> = tree
            .children
            .iter()
            .map(|c| (c.title.as_str(), c.order))
            .collect();
        assert_eq!(children, vec![("Administration", 1), ("Other", 1)]);
        assert_eq!(titles(&tree.children[0]), vec!["Users"]);
        assert_order_invariant(&tree);
    }

    #[test]
    fn test_fill_with_new_order_moves_before_equal_siblings() {
        let shell = ExportManifest::new(vec![
            decl("nav", "tools", "Tool"),
            decl("nav", "", "Two").with_order(2),
            decl("nav", "", "Three").with_order(3),
            decl("nav", "", "Tools").with_id("tools").with_order(3),
        ]);
        let mut builder = ExportTreeBuilder::new();
        builder.ingest(&shell, "").unwrap();
        let tree = builder.finish();

        assert_eq!(titles(&tree), vec!["Two", "Tools", "Three"]);
        assert!(!tree.children[1].placeholder);
        assert_order_invariant(&tree);
    }

    #[test]
    fn test_tag_is_stored_trimmed() {
        let shell = ExportManifest::new(vec![
            decl(" nav ", "", "Menu").with_id("menu"),
            decl("nav", "menu", "Item"),
        ]);
        let mut builder = ExportTreeBuilder::new();
        builder.ingest(&shell, "").unwrap();
        let tree = builder.finish();

        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].tag, "nav");
        assert_eq!(titles(&tree.children[0]), vec!["Item"]);
    }

    #[test]
    fn test_explicit_order_and_tie_keeps_arrival_order() {
        let shell = ExportManifest::new(vec![
            decl("nav", "", "Ten").with_order(10),
            decl("nav", "", "Five").with_order(5),
            decl("nav", "", "Five again").with_order(5),
            decl("nav", "", "Twenty").with_order(20),
        ]);
        let registry = registry_with(vec![("late", vec![decl("nav", "", "Late five").with_order(5)])]);
        let catalog = Catalog::new(vec![active("late", 1)]);

        let tree = build_export_tree(&shell, &catalog, &registry).unwrap();
        assert_eq!(
            titles(&tree),
            vec!["Five", "Five again", "Late five", "Ten", "Twenty"]
        );
        assert_order_invariant(&tree);
    }

    #[test]
    fn test_missing_order_is_child_count_plus_one() {
        let shell = ExportManifest::new(vec![
            decl("nav", "", "First"),
            decl("nav", "", "Second"),
            decl("nav", "", "Big").with_order(100),
            decl("nav", "", "Fourth"),
        ]);
        let mut builder = ExportTreeBuilder::new();
        builder.ingest(&shell, "").unwrap();
        let tree = builder.finish();

        let orders: Vec<i64> = tree.children.iter().map(|c| c.order).collect();
        assert_eq!(orders, vec![1, 2, 4, 100]);
        assert_eq!(titles(&tree), vec!["First", "Second", "Fourth", "Big"]);
    }

    #[test]
    fn test_placeholders_respect_order_invariant() {
        let shell = ExportManifest::new(vec![
            decl("nav", "", "One").with_order(1),
            decl("nav", "", "Fifty").with_order(50),
        ]);
        let registry = registry_with(vec![("m", vec![decl("nav", "extras", "Extra")])]);
        let catalog = Catalog::new(vec![active("m", 1)]);

        let tree = build_export_tree(&shell, &catalog, &registry).unwrap();
        assert_eq!(titles(&tree), vec!["One", "Extras", "Fifty"]);
        assert_order_invariant(&tree);
    }

    #[test]
    fn test_module_cannot_forge_area() {
        let registry = registry_with(vec![(
            "sneaky",
            vec![decl("nav", "", "Forged").with_attribute("area", serde_json::json!("victim"))],
        )]);
        let catalog = Catalog::new(vec![active("sneaky", 1)]);

        let tree = build_export_tree(&ExportManifest::default(), &catalog, &registry).unwrap();
        let node = &tree.children[0];
        assert_eq!(node.area, "sneaky");
        assert!(!node.attributes.contains_key("area"));
    }

    #[test]
    fn test_empty_tag_is_configuration_error() {
        let shell = ExportManifest::new(vec![decl("nav", "", "Ok"), decl("  ", "", "Broken")]);
        let err = build_export_tree(&shell, &Catalog::default(), &ModuleRegistry::new()).unwrap_err();
        assert!(matches!(err, PluginShellError::Configuration { .. }));
    }

    #[test]
    fn test_only_active_registered_modules_contribute() {
        let registry = registry_with(vec![
            ("on", vec![decl("nav", "", "On")]),
            ("off", vec![decl("nav", "", "Off")]),
            ("waiting", vec![decl("nav", "", "Waiting")]),
        ]);
        let catalog = Catalog::new(vec![
            active("on", 1),
            ModuleRecord::new("off", 2, ModuleStatus::Inactive),
            ModuleRecord::new("waiting", 3, ModuleStatus::Pending),
            active("unregistered", 4),
        ]);

        let tree = build_export_tree(&ExportManifest::default(), &catalog, &registry).unwrap();
        assert_eq!(titles(&tree), vec!["On"]);
    }

    #[test]
    fn test_build_is_idempotent() {
        let shell = ExportManifest::new(vec![decl("nav", "", "Home"), decl("nav", "menu", "Shell item")]);
        let registry = registry_with(vec![
            ("a", vec![decl("nav", "menu", "Item"), decl("nav", "", "Home")]),
            ("b", vec![decl("nav", "menu", "item"), decl("side", "panel/x", "Panel")]),
        ]);
        let catalog = Catalog::new(vec![active("b", 2), active("a", 1)]);

        let first = build_export_tree(&shell, &catalog, &registry).unwrap();
        let second = build_export_tree(&shell, &catalog, &registry).unwrap();
        assert_eq!(first, second);
        assert_order_invariant(&first);
    }

    #[test]
    fn test_conflicts_resolved_within_nested_levels() {
        let registry = registry_with(vec![
            ("a", vec![decl("nav", "menu", "Settings")]),
            ("b", vec![decl("nav", "menu", "Settings")]),
        ]);
        let catalog = Catalog::new(vec![active("a", 1), active("b", 2)]);

        let tree = build_export_tree(&ExportManifest::default(), &catalog, &registry).unwrap();
        let menu = tree.find_path("menu").unwrap();
        assert_eq!(menu.title, "Menu");
        assert_eq!(titles(menu), vec!["A: Settings", "B: Settings"]);
    }

    #[test]
    fn test_walk_visits_every_node() {
        let mut builder = ExportTreeBuilder::new();
        builder
            .ingest(&ExportManifest::new(vec![decl("nav", "a/b", "Leaf")]), "")
            .unwrap();
        let tree = builder.finish();
        let ids: Vec<&str> = tree.walk().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec![".", "a", "b", ""]);
        assert_eq!(tree.node_count(), 4);
    }
}
