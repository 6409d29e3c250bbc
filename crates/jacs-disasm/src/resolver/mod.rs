use jacs_core::DebugInfo;

/// Supplies human-readable names for instruction operands.
pub trait InstrArgResolver {
    /// Name for operand `idx` of placeholder class `fmt` (`l` local, `g` global, ...).
    fn describe_cell(&self, fmt: char, idx: i64) -> Option<String>;

    /// Program counter of the instruction being decoded.
    fn resolver_pc(&self) -> Option<i64> {
        None
    }
}

/// Resolver backed by compiler debug info.
#[derive(Debug, Clone)]
pub struct DebugInfoResolver<'a> {
    info: &'a DebugInfo,
    function: Option<usize>,
    pc: Option<i64>,
}

impl<'a> DebugInfoResolver<'a> {
    pub fn new(info: &'a DebugInfo) -> Self {
        Self { info, function: None, pc: None }
    }

    /// Selects the function whose locals are used for `%l` operands.
    pub fn with_function(mut self, function: usize) -> Self {
        self.function = Some(function);
        self
    }

    pub fn set_pc(&mut self, pc: Option<i64>) {
        self.pc = pc;
    }

    pub fn debug_info(&self) -> &'a DebugInfo {
        self.info
    }
}

impl InstrArgResolver for DebugInfoResolver<'_> {
    fn describe_cell(&self, fmt: char, idx: i64) -> Option<String> {
        let idx = usize::try_from(idx).ok()?;
        let name = match fmt {
            'l' => {
                let func = self.info.functions.get(self.function?)?;
                &func.locals.get(idx)?.name
            }
            'g' => &self.info.globals.get(idx)?.name,
            'R' | 'r' => &self.info.roles.get(idx)?.name,
            'F' => &self.info.functions.get(idx)?.name,
            _ => return None,
        };
        (!name.is_empty()).then(|| name.clone())
    }

    fn resolver_pc(&self) -> Option<i64> {
        self.pc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jacs_core::{CellDebugInfo, FunctionDebugInfo, RoleDebugInfo};

    fn info() -> DebugInfo {
        DebugInfo {
            functions: vec![
                FunctionDebugInfo {
                    name: "main".into(),
                    srcmap: vec![],
                    locals: vec![CellDebugInfo { name: "i".into() }],
                },
                FunctionDebugInfo { name: "blink".into(), ..Default::default() },
            ],
            roles: vec![RoleDebugInfo { name: "led".into(), service_class: 0x1609d4f0 }],
            globals: vec![CellDebugInfo { name: "count".into() }, CellDebugInfo::default()],
            source: String::new(),
        }
    }

    #[test]
    fn test_describe_cells() {
        let info = info();
        let res = DebugInfoResolver::new(&info).with_function(0);
        assert_eq!(res.describe_cell('l', 0).as_deref(), Some("i"));
        assert_eq!(res.describe_cell('g', 0).as_deref(), Some("count"));
        assert_eq!(res.describe_cell('R', 0).as_deref(), Some("led"));
        assert_eq!(res.describe_cell('F', 1).as_deref(), Some("blink"));
        assert_eq!(res.describe_cell('g', 1), None);
        assert_eq!(res.describe_cell('g', 7), None);
        assert_eq!(res.describe_cell('l', -1), None);
        assert_eq!(res.describe_cell('S', 0), None);
    }

    #[test]
    fn test_locals_need_function() {
        let info = info();
        let mut res = DebugInfoResolver::new(&info);
        assert_eq!(res.describe_cell('l', 0), None);
        assert_eq!(res.resolver_pc(), None);
        res.set_pc(Some(12));
        assert_eq!(res.resolver_pc(), Some(12));
    }
}
