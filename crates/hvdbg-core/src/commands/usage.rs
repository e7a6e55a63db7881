//! Usage text printed after syntax and validation errors, and by `help`.

pub const CLEAR: &str = "\
clear : clears the screen.

syntax : \tclear | cls | .cls
";

pub const CONNECT: &str = "\
.connect : connects to a remote or local machine to start debugging.

syntax : \t.connect [ip] [port]
\t\te.g : .connect 192.168.1.5 50000
\t\te.g : .connect local
";

pub const DISCONNECT: &str = "\
.disconnect : disconnect from a debugging session (it won't unload the modules).

syntax : \t.disconnect
";

pub const LOAD: &str = "\
load : installs the driver and load the kernel modules.

syntax : \tload
";

pub const UNLOAD: &str = "\
unload : unloads the kernel modules and uninstalls the drivers.

syntax : \tunload
";

pub const EXIT: &str = "\
exit : unload and uninstalls the drivers and closes the debugger.

syntax : \texit | .exit
";

pub const CPU: &str = "\
cpu : collects a report from cpu features.

syntax : \tcpu
";

pub const RDMSR: &str = "\
rdmsr : Reads a model-specific register (MSR).

syntax : \trdmsr [rcx (hex value)] core [core index (hex value - optional)]
\t\te.g : rdmsr c0000082
\t\te.g : rdmsr c0000082 core 2
";

pub const WRMSR: &str = "\
wrmsr : Writes on a model-specific register (MSR).

syntax : \twrmsr [ecx (hex value)] [value to write - EDX:EAX (hex value)] core [core index (hex value - optional)]
\t\te.g : wrmsr c0000082 fffff8077356f010
\t\te.g : wrmsr c0000082 fffff8077356f010 core 2
";

pub const FORMATS: &str = "\
.formats : Show a value in different formats.

syntax : \t.formats [hex value]
\t\te.g : .formats fffff801`deadbeef
";

pub const READ_MEMORY: &str = "\
u !u & db dc dd dq !db !dc !dd !dq : read the memory different shapes (hex) and disassembler
d[b]  Byte and ASCII characters
d[c]  Double-word values (4 bytes) and ASCII characters
d[d]  Double-word values (4 bytes)
d[q]  Quad-word values (8 bytes).
u  Disassembler at the target address

 If you want to read physical memory then add '!' at the start of the command
You can also disassemble physical memory using '!u'
syntax : \t[!]d[b|c|d|q] [address] l [length (hex)] pid [process id (hex)]
\t\te.g : db fffff8077356f010
\t\te.g : !dq 100000
\t\te.g : u fffff8077356f010
";

pub const HIDDEN_HOOK: &str = "\
!hiddenhook : hooks an address through the hypervisor (arguments are echoed).

syntax : \t!hiddenhook | bh [type] [address] [pid] [action]
\t\te.g : bh all break fffff801deadbeef
\t\te.g : !hiddenhook process 8e34 fffff801deadbeef
";

pub const HELP: &str = "\
help : lists the commands, or shows the syntax of one command.

syntax : \thelp [command]
\t\te.g : help rdmsr
";
